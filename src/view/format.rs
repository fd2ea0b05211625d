use chrono::{DateTime, Local, Utc};

/// 유로 금액 ("€12.5", 정수는 소수점 없이)
pub fn euro(amount: f64) -> String {
    format!("€{}", amount_text(amount))
}

pub fn amount_text(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        format!("{}", amount)
    }
}

/// 지역 시간 표기
pub fn date_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// 로그인 시각 기준 남은 시간 ("2d 3h", 0인 단위는 생략)
pub fn countdown_from_login(terminates_at: DateTime<Utc>, login_at: DateTime<Utc>) -> String {
    let hours = (terminates_at - login_at).num_seconds() as f64 / 3600.0;
    let days = (hours / 24.0).floor() as i64;
    let rest = (hours % 24.0).floor() as i64;

    let mut output = String::new();
    if days != 0 {
        output.push_str(&format!("{}d", days));
    }
    if days != 0 && rest != 0 {
        output.push(' ');
    }
    if rest != 0 {
        output.push_str(&format!("{}h", rest));
    }
    output
}

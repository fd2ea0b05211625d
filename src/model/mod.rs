use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 경매 식별자
pub type AuctionId = i64;

/// 상품 식별자
pub type ArticleId = i64;

// 경매 모델
// 목록 종류에 따라 서버가 붙여 주는 필드(낙찰자, 상품 목록, 최고 입찰가)는 선택 필드로 둔다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Auction {
    pub id: AuctionId,
    pub creator_user_id: i64,
    pub creator_user_username: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub terminates_at: DateTime<Utc>,
    pub closed_by_user: bool,
    pub minimum_bid_wedge: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_user_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_user_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_bid_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bid: Option<f64>,
    #[serde(rename = "articleList", default, skip_serializing_if = "Vec::is_empty")]
    pub article_list: Vec<Article>,
}

impl Auction {
    /// 종료 시각이 지났는지 확인
    pub fn is_terminated(&self, now: DateTime<Utc>) -> bool {
        self.terminates_at < now
    }

    /// 목록에 표시할 최고 입찰가 (닫힌 경매는 최종 낙찰가)
    pub fn highest_bid(&self) -> f64 {
        if self.closed_by_user {
            self.final_bid_amount.unwrap_or_default()
        } else {
            self.max_bid.unwrap_or_default()
        }
    }
}

// 상품 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub owner_user_id: i64,
    pub base_price: f64,
    // 경매에 포함되지 않은 상품은 0
    #[serde(default)]
    pub auction_id: AuctionId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "imageBase64", default)]
    pub image_base64: String,
}

impl Article {
    pub fn image(&self) -> Option<&str> {
        if self.image_base64.is_empty() {
            None
        } else {
            Some(&self.image_base64)
        }
    }
}

// 입찰 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id: i64,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub placed_at: DateTime<Utc>,
    pub bidder_user_id: i64,
    pub bidder_user_username: String,
    pub auction_id: AuctionId,
    pub amount: f64,
}

// region:    --- Timestamp
/// 서버 시각 필드 파싱
/// 서비스는 Gson 기본 형식("Jan 15, 2030, 3:00:00 PM", 서버 현지 시각)으로 보내고
/// 캐시에는 RFC 3339로 저장되므로 둘 다 읽는다.
pub mod timestamp {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    const GSON_FORMATS: [&str; 2] = ["%b %e, %Y, %l:%M:%S %p", "%b %e, %Y %l:%M:%S %p"];

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let text = raw.trim();
        if let Ok(at) = DateTime::parse_from_rfc3339(text) {
            return Some(at.with_timezone(&Utc));
        }

        // 최근 JDK는 AM/PM 앞에 좁은 공백(U+202F)을 넣는다
        let normalized = text.replace(|c: char| c == '\u{202f}' || c == '\u{a0}', " ");
        GSON_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(&normalized, format).ok())
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
            .map(|at| at.with_timezone(&Utc))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("unrecognized timestamp: {}", raw)))
    }
}
// endregion: --- Timestamp

/// 폼 입력 및 클라이언트 측 제약 검사
/// 검사에 실패한 폼은 네트워크 요청 없이 사용자에게 바로 보고된다.
// region:    --- Imports
use crate::gateway::{FilePart, MultipartForm};
use crate::model::ArticleId;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

// endregion: --- Imports

// region:    --- Errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("Please fill out the {0} field")]
    MissingField(&'static str),
    #[error("{0} must be a number")]
    InvalidNumber(&'static str),
    #[error("{field} must be at least {minimum}")]
    BelowMinimum { field: &'static str, minimum: f64 },
    #[error("{0} must be a valid date and time")]
    InvalidDateTime(&'static str),
    #[error("{0} must be in the future")]
    NotInFuture(&'static str),
    #[error("Select at least one article to create an auction")]
    NoArticleSelected,
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, FormError> {
    let value = value.trim();
    if value.is_empty() {
        Err(FormError::MissingField(field))
    } else {
        Ok(value)
    }
}

fn number(value: &str, field: &'static str) -> Result<f64, FormError> {
    required(value, field)?
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or(FormError::InvalidNumber(field))
}
// endregion: --- Errors

// region:    --- Login
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub user: String,
    pub pass: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormError> {
        required(&self.user, "user")?;
        required(&self.pass, "pass")?;
        Ok(())
    }
}
// endregion: --- Login

// region:    --- Search
#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    pub q: String,
}
// endregion: --- Search

// region:    --- Place Bid
#[derive(Debug, Clone, Default)]
pub struct PlaceBidForm {
    pub bid: String,
}

impl PlaceBidForm {
    /// 입찰 금액 검사 (최소 입찰가 이상)
    pub fn validate(&self, minimum: f64) -> Result<f64, FormError> {
        let amount = number(&self.bid, "bid")?;
        let floor = minimum.max(0.0);
        if amount < floor || amount <= 0.0 {
            return Err(FormError::BelowMinimum {
                field: "bid",
                minimum: floor,
            });
        }
        Ok(amount)
    }
}
// endregion: --- Place Bid

// region:    --- Add Article
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct AddArticleForm {
    pub name: String,
    pub base_price: String,
    pub description: String,
    pub image: Option<ImageUpload>,
}

impl AddArticleForm {
    /// 검사 후 multipart 폼으로 변환
    pub fn validate(&self) -> Result<MultipartForm, FormError> {
        let name = required(&self.name, "name")?;
        let price = number(&self.base_price, "basePrice")?;
        if price <= 0.0 {
            return Err(FormError::BelowMinimum {
                field: "basePrice",
                minimum: 0.01,
            });
        }

        let mut form = MultipartForm::default()
            .text("name", name)
            .text("basePrice", self.base_price.trim())
            .text("desc", self.description.trim());
        if let Some(image) = &self.image {
            form = form.file(FilePart {
                name: "image".to_string(),
                file_name: image.file_name.clone(),
                content_type: image.content_type.clone(),
                bytes: image.bytes.clone(),
            });
        }
        Ok(form)
    }
}
// endregion: --- Add Article

// region:    --- Add Auction
/// datetime-local 입력 형식
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, Default)]
pub struct AddAuctionForm {
    pub terminates_at: String,
    pub min_bid_delta: String,
    pub articles: Vec<ArticleId>,
}

/// 검사를 통과한 경매 생성 입력
#[derive(Debug, Clone, PartialEq)]
pub struct ValidAuction {
    pub terminates_at: String,
    pub min_bid_delta: i64,
    pub articles: Vec<ArticleId>,
}

impl AddAuctionForm {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<ValidAuction, FormError> {
        let raw = required(&self.terminates_at, "terminatesAt")?;
        let naive = NaiveDateTime::parse_from_str(raw, DATETIME_LOCAL_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
            .map_err(|_| FormError::InvalidDateTime("terminatesAt"))?;
        let terminates_at = Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or(FormError::InvalidDateTime("terminatesAt"))?;
        if terminates_at.with_timezone(&Utc) <= now {
            return Err(FormError::NotInFuture("terminatesAt"));
        }

        let delta = number(&self.min_bid_delta, "minBidDelta")?;
        if delta.fract() != 0.0 {
            return Err(FormError::InvalidNumber("minBidDelta"));
        }
        if delta < 1.0 {
            return Err(FormError::BelowMinimum {
                field: "minBidDelta",
                minimum: 1.0,
            });
        }

        if self.articles.is_empty() {
            return Err(FormError::NoArticleSelected);
        }

        Ok(ValidAuction {
            terminates_at: raw.to_string(),
            min_bid_delta: delta as i64,
            articles: self.articles.clone(),
        })
    }
}
// endregion: --- Add Auction

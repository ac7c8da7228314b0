mod news;
mod period;
mod price;
mod symbol;
mod timestamp;

pub use news::{NewsArticle, SentimentSummary};
pub use period::Period;
pub use price::{PricePoint, PriceSeries};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;

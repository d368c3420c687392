pub mod catalog;
pub mod errors;
pub mod matcher;
pub mod record;
pub mod responder;
pub mod validator;

pub use catalog::{Catalog, MatchResult, ZONE_TTL, Zone};
pub use errors::{Result, ZoneError};
pub use matcher::{ZoneMatch, match_zone};
pub use record::ZoneRecord;
pub use responder::AuthoritativeResponder;
pub use validator::validate_query;

use foundation::ids::{Day, LoadToken};
use scene::DatasetKind;

/// One dataset fetch issued on behalf of a `load_day` call.
///
/// The token captured here is compared against the session's current token
/// when the response arrives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetRequest {
    pub token: LoadToken,
    pub day: Day,
    pub kind: DatasetKind,
    pub url: String,
}

/// The pair of independent fetches a day change issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRequests {
    pub token: LoadToken,
    pub day: Day,
    pub points: DatasetRequest,
    pub polygons: DatasetRequest,
}

impl DayRequests {
    pub fn into_array(self) -> [DatasetRequest; 2] {
        [self.points, self.polygons]
    }
}

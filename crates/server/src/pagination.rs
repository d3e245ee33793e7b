use serde::Deserialize;

pub const DEFAULT_LIMIT: u64 = 9;
pub const MAX_LIMIT: u64 = 100;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    start_index: u64,

    #[serde(default = "default_limit")]
    limit: u64,
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl Pagination {
    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> u64 {
        self.start_index
    }
}

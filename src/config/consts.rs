// src/config/consts.rs

// Region markers
pub const TBODY_OPEN: &str = "<tbody>";
pub const TBODY_CLOSE: &str = "</tbody>";
pub const ROW_TAG: &str = "tr";

// Responsibility actor charts
pub const RESP_DIR: &str = "Resp_Charts";
pub const RESP_PATTERN: &str = "risk*_resp_actors_chart.html";
pub const RESP_SUFFIX: &str = "_chart.html";
pub const ACTOR_ATTR: &str = "data-actor";
pub const ALL_ACTORS: &str = "All Actors";

// Sector vulnerability charts
pub const SECTOR_DIR: &str = "Sec_Charts";
pub const SECTOR_PATTERN: &str = "risk_*_sector_vulnerability.html";
pub const SECTOR_ATTR: &str = "data-sector";
pub const ALL_SECTORS: &str = "All Sectors";

// Concurrency
pub const WORKERS: usize = 4;

// Output
pub const TMP_SUFFIX: &str = ".tmp";

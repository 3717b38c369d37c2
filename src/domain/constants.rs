//! 도메인 상수들 - 고정된 필터 옵션 도메인과 캐시/디바운스 정책
//!
//! These values are fixed at build time and shared between the filter state
//! machine, the resource cache, and the IPC surface.

use once_cell::sync::Lazy;

/// Fixed option domains for the numeric multi-select filters
pub mod filters {
    use super::Lazy;

    /// Number-of-sessions options: 1..=20, then 30, 40, ... 100
    pub static NUMBER_OF_PROGRESSES_OPTIONS: Lazy<Vec<u32>> =
        Lazy::new(|| (1..=20).chain((30..=100).step_by(10)).collect());

    /// Sessions-per-week options: 1..=7
    pub const SESSIONS_PER_WEEK_OPTIONS: [u32; 7] = [1, 2, 3, 4, 5, 6, 7];

    /// Selectable page sizes
    pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];

    /// Default page size for a fresh filter set
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    /// Quiet period before a search keystroke is committed (milliseconds)
    pub const SEARCH_DEBOUNCE_MS: u64 = 500;
}

/// Cache lifetimes
pub mod cache {
    /// Resources envelope TTL (hours) - the taxonomy rarely changes
    pub const RESOURCES_TTL_HOURS: u64 = 24;

    /// Freshness window for an identical product search (minutes)
    pub const SEARCH_FRESHNESS_MINUTES: u64 = 5;
}

/// Taxonomy-specific reserved codes
pub mod taxonomy {
    /// Category codes starting with this prefix are main (GNB) categories,
    /// e.g. CTG10000000001 for Classes
    pub const MAIN_CATEGORY_PREFIX: &str = "CTG10";

    /// Location code of the only country whose subdivisions are surfaced
    pub const VIETNAM_COUNTRY_CODE: &str = "VNM";
}

/// Locale handling
pub mod locale {
    /// Locale code sent with every request (pre-localized strings come back)
    pub const DEFAULT_LOCALE_CODE: &str = "ENG";
}

#[cfg(test)]
mod tests {
    use super::filters::{
        DEFAULT_PAGE_SIZE, NUMBER_OF_PROGRESSES_OPTIONS, PAGE_SIZE_OPTIONS,
        SESSIONS_PER_WEEK_OPTIONS,
    };

    #[test]
    fn number_of_progresses_options_cover_both_ranges() {
        let options = &*NUMBER_OF_PROGRESSES_OPTIONS;
        assert_eq!(options.len(), 28);
        assert_eq!(options[0], 1);
        assert_eq!(options[19], 20);
        assert_eq!(options[20], 30);
        assert_eq!(*options.last().unwrap(), 100);
    }

    #[test]
    fn default_page_size_is_a_valid_option() {
        assert!(PAGE_SIZE_OPTIONS.contains(&DEFAULT_PAGE_SIZE));
        assert_eq!(SESSIONS_PER_WEEK_OPTIONS.len(), 7);
    }
}

//! Lead reference numbers: `LD-YYYYMMDD-XXXX`

use chrono::NaiveDate;
use tripdesk_domain::constants::{LEAD_REFERENCE_PREFIX, LEAD_REFERENCE_SUFFIX_LEN};
use uuid::Uuid;

/// Build a reference for `date` with a random uppercase hex suffix.
pub fn generate(date: NaiveDate) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(LEAD_REFERENCE_SUFFIX_LEN)
        .collect::<String>()
        .to_uppercase();
    format!("{}-{}-{}", LEAD_REFERENCE_PREFIX, date.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_has_date_and_suffix() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let reference = generate(date);
        assert!(reference.starts_with("LD-20240105-"));
        assert_eq!(reference.len(), "LD-20240105-".len() + 4);
        assert!(reference[12..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }
}

use dealerhub_core::normalize::{identity_key, phone_digits};

use crate::SearchIndexEntry;

/// Queries shorter than this (after trimming) return nothing.
pub const MIN_QUERY_LEN: usize = 2;

/// A parsed query with its normalized forms precomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    lowered: String,
    digits: String,
    identity: String,
}

impl SearchQuery {
    /// `None` when the trimmed query is too short to search.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN {
            return None;
        }
        Some(Self {
            raw: raw.to_string(),
            lowered: trimmed.to_lowercase(),
            digits: phone_digits(trimmed),
            identity: identity_key(trimmed),
        })
    }

    /// The query exactly as the caller sent it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, entry: &SearchIndexEntry) -> bool {
        if entry.canonical_name.to_lowercase().contains(&self.lowered) {
            return true;
        }
        if entry
            .email
            .as_deref()
            .is_some_and(|email| email.to_lowercase().contains(&self.lowered))
        {
            return true;
        }
        // A query with no digits (or no word characters) must not match every
        // phone (or identity) through the empty string.
        if !self.digits.is_empty() && entry.phone_norm.contains(&self.digits) {
            return true;
        }
        !self.identity.is_empty() && entry.identity_norm.contains(&self.identity)
    }
}

/// Filter `entries` in their given order. Callers pass employees first, then
/// customers, each in creation order.
pub fn search<I>(query: &SearchQuery, entries: I) -> Vec<SearchIndexEntry>
where
    I: IntoIterator<Item = SearchIndexEntry>,
{
    entries.into_iter().filter(|e| query.matches(e)).collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use proptest::prelude::*;

    use dealerhub_core::{CustomerId, DealerId, EmployeeId};
    use dealerhub_parties::{Customer, CustomerType, Employee, NewCustomer, NewEmployee};

    use super::*;

    fn employee(first: &str, phone: &str, aadhar: &str) -> SearchIndexEntry {
        let e = Employee::create(
            EmployeeId::new(),
            DealerId::new(),
            NewEmployee {
                first_name: first.into(),
                last_name: "Kumar".into(),
                phone: phone.into(),
                email: Some(format!("{}@dealer.in", first.to_lowercase())),
                aadhar: aadhar.into(),
                designation: None,
                joining_date: None,
            },
            Utc::now(),
        );
        SearchIndexEntry::from_employee(&e, "Acme")
    }

    fn customer(name: &str, official_id: &str) -> SearchIndexEntry {
        let c = Customer::create(
            CustomerId::new(),
            DealerId::new(),
            NewCustomer {
                name_or_entity: name.into(),
                customer_type: CustomerType::Individual,
                phone: "044 3333 5555".into(),
                email: None,
                official_id: official_id.into(),
                address: None,
            },
            Utc::now(),
        );
        SearchIndexEntry::from_customer(&c, "Acme")
    }

    #[test]
    fn short_queries_do_not_parse() {
        assert_eq!(SearchQuery::parse(""), None);
        assert_eq!(SearchQuery::parse("a"), None);
        assert_eq!(SearchQuery::parse("  a  "), None);
        assert!(SearchQuery::parse("ab").is_some());
    }

    #[test]
    fn partial_phone_matches_after_normalization() {
        let q = SearchQuery::parse("987").unwrap();
        let hit = employee("Asha", "+91 987-654-3210", "1111 2222 3333");
        let miss = employee("Ravi", "+91 123-456-7890", "4444 5555 6666");
        let found = search(&q, vec![hit.clone(), miss]);
        assert_eq!(found, vec![hit]);
    }

    #[test]
    fn formatted_query_matches_plain_phone() {
        let q = SearchQuery::parse("654-32").unwrap();
        assert!(q.matches(&employee("Asha", "9876543210", "1")));
    }

    #[test]
    fn name_and_email_match_case_insensitively() {
        let entry = employee("Asha", "9876543210", "1");
        assert!(SearchQuery::parse("ASHA k").unwrap().matches(&entry));
        assert!(SearchQuery::parse("@DEALER").unwrap().matches(&entry));
    }

    #[test]
    fn identity_matches_ignoring_separators_and_case() {
        let entry = customer("Meera", "AB-12 CD");
        assert!(SearchQuery::parse("b12c").unwrap().matches(&entry));
    }

    #[test]
    fn letters_only_query_does_not_match_every_phone() {
        let entry = customer("Meera", "123");
        assert!(!SearchQuery::parse("zz").unwrap().matches(&entry));
    }

    #[test]
    fn results_keep_input_order() {
        let q = SearchQuery::parse("kumar").unwrap();
        let a = employee("Asha", "9876543210", "1");
        let b = employee("Ravi", "9876543211", "2");
        let found = search(&q, vec![a.clone(), b.clone()]);
        assert_eq!(found, vec![a, b]);
    }

    #[test]
    fn raw_query_is_preserved() {
        assert_eq!(SearchQuery::parse(" 987 ").unwrap().raw(), " 987 ");
    }

    proptest! {
        #[test]
        fn any_substring_of_phone_digits_finds_the_record(start in 0usize..10, len in 2usize..6) {
            let entry = employee("Zed", "+91 987-654-3210", "1");
            let digits = entry.phone_norm.clone();
            let end = (start + len).min(digits.len());
            prop_assume!(end - start >= 2);
            let q = SearchQuery::parse(&digits[start..end]).unwrap();
            prop_assert!(q.matches(&entry));
        }
    }
}

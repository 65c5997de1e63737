use chrono::{DateTime, Local, Utc};
use nixt_core::api::{Priority, ProjectStatus};
use nixt_core::auth::AuthProviderKind;
use nixt_core::dashboard::GrantRole;
use nixt_core::preferences::Language;
use std::collections::BTreeSet;

use crate::cli::{LanguageArg, PriorityArg, ProviderArg, RoleArg, StatusArg};

pub fn format_datetime(datetime: &DateTime<Utc>) -> String {
    datetime
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

pub fn format_optional(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

pub fn format_sections(sections: &BTreeSet<String>) -> String {
    if sections.is_empty() {
        "-".to_string()
    } else {
        sections.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

impl From<RoleArg> for GrantRole {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Client => GrantRole::Client,
            RoleArg::Manager => GrantRole::Manager,
            RoleArg::Viewer => GrantRole::Viewer,
        }
    }
}

impl From<LanguageArg> for Language {
    fn from(value: LanguageArg) -> Self {
        match value {
            LanguageArg::Ar => Language::Ar,
            LanguageArg::En => Language::En,
        }
    }
}

impl From<StatusArg> for ProjectStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Active => ProjectStatus::Active,
            StatusArg::Pending => ProjectStatus::Pending,
            StatusArg::Completed => ProjectStatus::Completed,
            StatusArg::Onhold => ProjectStatus::Onhold,
        }
    }
}

impl From<PriorityArg> for Priority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
            PriorityArg::Urgent => Priority::Urgent,
        }
    }
}

/// `all` means no provider filter.
pub fn provider_filter(value: ProviderArg) -> Option<AuthProviderKind> {
    match value {
        ProviderArg::All => None,
        ProviderArg::Local => Some(AuthProviderKind::Local),
        ProviderArg::Google => Some(AuthProviderKind::Google),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(None), "-");
        assert_eq!(format_optional(Some("")), "-");
        assert_eq!(format_optional(Some("x")), "x");
    }

    #[test]
    fn test_provider_filter() {
        assert_eq!(provider_filter(ProviderArg::All), None);
        assert_eq!(
            provider_filter(ProviderArg::Google),
            Some(AuthProviderKind::Google)
        );
    }

    #[test]
    fn test_format_sections() {
        let sections: BTreeSet<String> = ["projects", "overview"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(format_sections(&sections), "overview, projects");
        assert_eq!(format_sections(&BTreeSet::new()), "-");
    }
}

use std::fmt;

use crate::table::Table;

/// Logical fields the analyzers look for in an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Subject,
    Status,
    Priority,
    Date,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 4] = [
        ColumnRole::Subject,
        ColumnRole::Status,
        ColumnRole::Priority,
        ColumnRole::Date,
    ];

    /// Column name that binds the role outright when present.
    pub fn canonical_name(self) -> Option<&'static str> {
        match self {
            ColumnRole::Subject => Some("Subject"),
            ColumnRole::Status => Some("Status"),
            ColumnRole::Priority => Some("Priority"),
            ColumnRole::Date => None,
        }
    }

    /// Lowercase fragments, any of which marks a column as a candidate.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            ColumnRole::Subject => &["subject"],
            ColumnRole::Status => &["status"],
            ColumnRole::Priority => &["priority"],
            ColumnRole::Date => &["date", "created", "updated", "time"],
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColumnRole::Subject => "subject",
            ColumnRole::Status => "status",
            ColumnRole::Priority => "priority",
            ColumnRole::Date => "date",
        })
    }
}

/// Binds `role` to one of `columns`.
///
/// An exact canonical name wins; otherwise the first column (in declared
/// order) whose lowercased name contains one of the role's keywords.
pub fn resolve_column<'a>(columns: &[&'a str], role: ColumnRole) -> Option<&'a str> {
    if let Some(canonical) = role.canonical_name() {
        if let Some(exact) = columns.iter().find(|c| **c == canonical) {
            return Some(*exact);
        }
    }
    columns.iter().copied().find(|column| {
        let lower = column.to_lowercase();
        role.keywords().iter().any(|k| lower.contains(k))
    })
}

/// Role bindings for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub subject: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub date: Option<String>,
}

impl ResolvedColumns {
    pub fn resolve(table: &Table) -> Self {
        let names = table.column_names();
        let bind = |role| resolve_column(&names, role).map(str::to_string);
        ResolvedColumns {
            subject: bind(ColumnRole::Subject),
            status: bind(ColumnRole::Status),
            priority: bind(ColumnRole::Priority),
            date: bind(ColumnRole::Date),
        }
    }

    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        match role {
            ColumnRole::Subject => self.subject.as_deref(),
            ColumnRole::Status => self.status.as_deref(),
            ColumnRole::Priority => self.priority.as_deref(),
            ColumnRole::Date => self.date.as_deref(),
        }
    }

    pub fn unresolved(&self) -> Vec<ColumnRole> {
        ColumnRole::ALL
            .into_iter()
            .filter(|role| self.get(*role).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_name_beats_earlier_substring() {
        let cols = ["Ticket Status Reason", "Status"];
        assert_eq!(resolve_column(&cols, ColumnRole::Status), Some("Status"));
    }

    #[test]
    fn first_substring_match_in_order() {
        let cols = ["Id", "Email Subject", "Subject Line"];
        assert_eq!(
            resolve_column(&cols, ColumnRole::Subject),
            Some("Email Subject")
        );
    }

    #[test]
    fn date_accepts_any_keyword() {
        let cols = ["Requester", "Updated at", "Created at"];
        assert_eq!(resolve_column(&cols, ColumnRole::Date), Some("Updated at"));
        assert_eq!(
            resolve_column(&["RESOLUTION TIME"], ColumnRole::Date),
            Some("RESOLUTION TIME")
        );
    }

    #[test]
    fn no_match_is_none() {
        let cols = ["Id", "Requester"];
        for role in ColumnRole::ALL {
            assert_eq!(resolve_column(&cols, role), None);
        }
    }

    #[test]
    fn resolved_columns_lists_unresolved_roles() {
        let table = Table::from_rows(
            vec!["Subject".into(), "Ticket status".into()],
            Vec::new(),
        );
        let resolved = ResolvedColumns::resolve(&table);
        assert_eq!(resolved.get(ColumnRole::Status), Some("Ticket status"));
        assert_eq!(
            resolved.unresolved(),
            vec![ColumnRole::Priority, ColumnRole::Date]
        );
    }
}

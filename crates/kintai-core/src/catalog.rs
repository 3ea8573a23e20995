//! Static reference catalogs.
//!
//! Departments and project channels are supplied as fixed id/name pairs and
//! are opaque to the lifecycle core. The channel list is placeholder data
//! meant to be swapped for a Slack API lookup later.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Department {
    pub id: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProjectChannel {
    pub id: &'static str,
    pub name: &'static str,
}

pub const DEPARTMENTS: &[Department] = &[
    Department { id: "product", name: "プロダクト開発本部" },
    Department { id: "regional", name: "地域イベント事業部" },
    Department { id: "all", name: "全体" },
    Department { id: "new_business", name: "新規事業部" },
];

pub const PROJECT_CHANNELS: &[ProjectChannel] = &[
    ProjectChannel { id: "C0123ABCDE", name: "#20_プロダクト開発本部" },
    ProjectChannel { id: "C0456FGHIJ", name: "#03_hp制作" },
    ProjectChannel { id: "C0789KLMNO", name: "#41_hr-agent-os" },
    ProjectChannel { id: "C1234PQRST", name: "#10_地域イベント" },
    ProjectChannel { id: "C5678UVWXY", name: "#50_新規事業検討" },
];

pub fn department_by_id(id: &str) -> Option<&'static Department> {
    DEPARTMENTS.iter().find(|d| d.id == id)
}

pub fn project_channel_by_id(id: &str) -> Option<&'static ProjectChannel> {
    PROJECT_CHANNELS.iter().find(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_by_id() {
        assert_eq!(department_by_id("product").unwrap().name, "プロダクト開発本部");
        assert!(department_by_id("unknown").is_none());

        assert_eq!(
            project_channel_by_id("C0123ABCDE").unwrap().name,
            "#20_プロダクト開発本部"
        );
        assert!(project_channel_by_id("C0000").is_none());
    }
}

//! Pure functions for calculating deployment plans (Functional Core).

use std::fmt;

use super::config::{GsiConfig, TableConfig};

/// Represents the current state of a table.
#[derive(Debug, Clone)]
pub struct TableState {
    pub status: TableStatus,
    pub gsis: Vec<GsiState>,
}

impl TableState {
    /// True when the table and all of its indexes are active.
    pub fn is_settled(&self) -> bool {
        self.status == TableStatus::Active && self.gsis.iter().all(|g| g.status == GsiStatus::Active)
    }
}

/// Table status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Active,
    Creating,
    Updating,
    Deleting,
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Active => "ACTIVE",
            Self::Creating => "CREATING",
            Self::Updating => "UPDATING",
            Self::Deleting => "DELETING",
        };
        f.write_str(label)
    }
}

/// GSI state.
#[derive(Debug, Clone)]
pub struct GsiState {
    pub name: String,
    pub status: GsiStatus,
}

/// GSI status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GsiStatus {
    Active,
    Creating,
    Updating,
    Deleting,
}

/// Planned changes for deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployPlan {
    /// Table doesn't exist, needs to be created.
    CreateTable { config: TableConfig },
    /// Table exists, GSIs need to be added. DynamoDB accepts one new GSI per
    /// table update, so they are applied in order.
    AddGsis {
        table_name: String,
        gsis_to_add: Vec<GsiConfig>,
    },
    /// Table is up to date, no changes needed.
    NoChanges { table_name: String },
}

/// Plan for destroying a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestroyPlan {
    /// Table exists and will be deleted.
    DeleteTable { table_name: String },
    /// Table doesn't exist, nothing to do.
    AlreadyGone { table_name: String },
}

/// Pure function: Calculate what changes are needed to reach desired state.
///
/// Indexes present on the table but unknown to the registry are left alone.
pub fn calculate_deploy_plan(current: Option<&TableState>, desired: &TableConfig) -> DeployPlan {
    let Some(state) = current else {
        return DeployPlan::CreateTable {
            config: desired.clone(),
        };
    };

    let gsis_to_add: Vec<GsiConfig> = desired
        .gsis
        .iter()
        .filter(|gsi| !state.gsis.iter().any(|existing| existing.name == gsi.name))
        .cloned()
        .collect();

    if gsis_to_add.is_empty() {
        DeployPlan::NoChanges {
            table_name: desired.table_name.clone(),
        }
    } else {
        DeployPlan::AddGsis {
            table_name: desired.table_name.clone(),
            gsis_to_add,
        }
    }
}

/// Pure function: Calculate destroy plan.
pub fn calculate_destroy_plan(current: Option<&TableState>, table_name: &str) -> DestroyPlan {
    match current {
        Some(_) => DestroyPlan::DeleteTable {
            table_name: table_name.to_string(),
        },
        None => DestroyPlan::AlreadyGone {
            table_name: table_name.to_string(),
        },
    }
}

/// Pure function: Format a deploy plan for display.
pub fn format_deploy_plan(plan: &DeployPlan) -> Vec<String> {
    match plan {
        DeployPlan::CreateTable { config } => {
            let mut lines = vec![
                format!("+ Create table: {}", config.table_name),
                format!("  Partition key: {} (S)", config.partition_key),
                format!("  Sort key: {} (S)", config.sort_key),
            ];
            for gsi in &config.gsis {
                lines.push(format!(
                    "  + GSI: {} ({} / {})",
                    gsi.name, gsi.partition_key, gsi.sort_key
                ));
            }
            lines.push("  Billing: PAY_PER_REQUEST".to_string());
            lines
        }
        DeployPlan::AddGsis {
            table_name,
            gsis_to_add,
        } => {
            let mut lines = vec![format!("~ Update table: {}", table_name)];
            for gsi in gsis_to_add {
                lines.push(format!(
                    "  + Add GSI: {} ({} / {})",
                    gsi.name, gsi.partition_key, gsi.sort_key
                ));
            }
            lines
        }
        DeployPlan::NoChanges { table_name } => {
            vec![format!("= Table '{}' is up to date", table_name)]
        }
    }
}

/// Pure function: Format a destroy plan for display.
pub fn format_destroy_plan(plan: &DestroyPlan) -> Vec<String> {
    match plan {
        DestroyPlan::DeleteTable { table_name } => {
            vec![format!(
                "- Delete table: {} (ALL DATA WILL BE LOST)",
                table_name
            )]
        }
        DestroyPlan::AlreadyGone { table_name } => {
            vec![format!("= Table '{}' does not exist", table_name)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamodb::config::tablekit_table_config;

    fn state_with_gsis(names: &[&str]) -> TableState {
        TableState {
            status: TableStatus::Active,
            gsis: names
                .iter()
                .map(|name| GsiState {
                    name: name.to_string(),
                    status: GsiStatus::Active,
                })
                .collect(),
        }
    }

    #[test]
    fn test_missing_table_is_created() {
        let desired = tablekit_table_config("t");
        let plan = calculate_deploy_plan(None, &desired);
        assert_eq!(plan, DeployPlan::CreateTable { config: desired });
    }

    #[test]
    fn test_missing_gsis_are_added_in_order() {
        let desired = tablekit_table_config("t");
        let existing: Vec<String> = (1..=17).map(|n| format!("GSI{n}")).collect();
        let existing: Vec<&str> = existing.iter().map(String::as_str).collect();

        let plan = calculate_deploy_plan(Some(&state_with_gsis(&existing)), &desired);

        match plan {
            DeployPlan::AddGsis {
                table_name,
                gsis_to_add,
            } => {
                assert_eq!(table_name, "t");
                let names: Vec<&str> = gsis_to_add.iter().map(|g| g.name.as_str()).collect();
                assert_eq!(names, vec!["GSI18", "GSI19", "GSI20"]);
            }
            other => panic!("expected AddGsis, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_table_needs_no_changes() {
        let desired = tablekit_table_config("t");
        let mut names: Vec<String> = desired.gsis.iter().map(|g| g.name.clone()).collect();
        names.push("LegacyIndex".to_string());
        let names: Vec<&str> = names.iter().map(String::as_str).collect();

        let plan = calculate_deploy_plan(Some(&state_with_gsis(&names)), &desired);
        assert_eq!(
            plan,
            DeployPlan::NoChanges {
                table_name: "t".to_string()
            }
        );
    }

    #[test]
    fn test_destroy_plan() {
        let state = state_with_gsis(&[]);
        assert_eq!(
            calculate_destroy_plan(Some(&state), "t"),
            DestroyPlan::DeleteTable {
                table_name: "t".to_string()
            }
        );
        assert_eq!(
            calculate_destroy_plan(None, "t"),
            DestroyPlan::AlreadyGone {
                table_name: "t".to_string()
            }
        );
    }

    #[test]
    fn test_settled_state() {
        let mut state = state_with_gsis(&["GSI1"]);
        assert!(state.is_settled());

        state.gsis[0].status = GsiStatus::Creating;
        assert!(!state.is_settled());

        state.gsis[0].status = GsiStatus::Active;
        state.status = TableStatus::Updating;
        assert!(!state.is_settled());
    }

    #[test]
    fn test_format_create_plan() {
        let plan = DeployPlan::CreateTable {
            config: tablekit_table_config("t"),
        };
        let lines = format_deploy_plan(&plan);

        assert_eq!(lines[0], "+ Create table: t");
        assert_eq!(lines[1], "  Partition key: PKEY (S)");
        assert_eq!(lines[3], "  + GSI: GSI1 (GSI1PKEY / GSI1SKEY)");
        assert_eq!(lines.last().unwrap(), "  Billing: PAY_PER_REQUEST");
        assert_eq!(lines.len(), 3 + 20 + 1);
    }

    #[test]
    fn test_format_destroy_plan() {
        let lines = format_destroy_plan(&DestroyPlan::DeleteTable {
            table_name: "t".to_string(),
        });
        assert_eq!(lines, vec!["- Delete table: t (ALL DATA WILL BE LOST)"]);
    }
}

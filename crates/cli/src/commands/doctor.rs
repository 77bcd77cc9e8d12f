use restock_core::config::{AppConfig, LoadOptions};
use restock_core::replenishment::ReplenishmentEngine;
use restock_db::{connect_with_settings, migrations, ping};
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    /// 0 when every check passes, 2 for config problems, 4 for database problems.
    fn exit_code(&self) -> u8 {
        let failed = |name: &str| {
            self.checks.iter().any(|check| check.name == name && check.status == CheckStatus::Fail)
        };
        if failed("config_validation") || failed("replenishment_policy") {
            2
        } else if self.overall_status == CheckStatus::Pass {
            0
        } else {
            4
        }
    }
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = report.exit_code();

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_replenishment_policy(&config));
            checks.extend(check_database(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["replenishment_policy", "database_connectivity", "database_schema"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_replenishment_policy(config: &AppConfig) -> DoctorCheck {
    match ReplenishmentEngine::new(config.replenishment.policy()) {
        Ok(engine) => DoctorCheck {
            name: "replenishment_policy",
            status: CheckStatus::Pass,
            details: format!(
                "window of {} weeks, fallback multiplier {}",
                engine.policy().window_weeks,
                engine.policy().fallback_multiplier
            ),
        },
        Err(error) => DoctorCheck {
            name: "replenishment_policy",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

/// Connectivity, then schema presence on the same pool.
fn check_database(config: &AppConfig) -> Vec<DoctorCheck> {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return vec![DoctorCheck {
                name: "database_connectivity",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            }];
        }
    };

    runtime.block_on(async {
        let pool = match connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        {
            Ok(pool) => pool,
            Err(error) => {
                return vec![
                    DoctorCheck {
                        name: "database_connectivity",
                        status: CheckStatus::Fail,
                        details: format!("failed to connect to database: {error}"),
                    },
                    DoctorCheck {
                        name: "database_schema",
                        status: CheckStatus::Skipped,
                        details: "skipped because the database is unreachable".to_string(),
                    },
                ];
            }
        };

        let connectivity = match ping(&pool).await {
            Ok(()) => DoctorCheck {
                name: "database_connectivity",
                status: CheckStatus::Pass,
                details: format!("connected using `{}`", config.database.url),
            },
            Err(error) => DoctorCheck {
                name: "database_connectivity",
                status: CheckStatus::Fail,
                details: format!("database query failed: {error}"),
            },
        };

        let schema = match migrations::history_table_count(&pool).await {
            Ok(2) => DoctorCheck {
                name: "database_schema",
                status: CheckStatus::Pass,
                details: "sales_data and stock_data tables present".to_string(),
            },
            Ok(_) => DoctorCheck {
                name: "database_schema",
                status: CheckStatus::Fail,
                details: "history tables missing; run `restock migrate`".to_string(),
            },
            Err(error) => DoctorCheck {
                name: "database_schema",
                status: CheckStatus::Fail,
                details: format!("schema inspection failed: {error}"),
            },
        };

        pool.close().await;
        vec![connectivity, schema]
    })
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::{CheckStatus, DoctorCheck, DoctorReport};

    fn report(checks: Vec<(&'static str, CheckStatus)>) -> DoctorReport {
        let all_pass = checks.iter().all(|(_, status)| *status == CheckStatus::Pass);
        DoctorReport {
            overall_status: if all_pass { CheckStatus::Pass } else { CheckStatus::Fail },
            summary: String::new(),
            checks: checks
                .into_iter()
                .map(|(name, status)| DoctorCheck { name, status, details: String::new() })
                .collect(),
        }
    }

    #[test]
    fn exit_code_prefers_config_failures() {
        let failing = report(vec![
            ("config_validation", CheckStatus::Fail),
            ("database_connectivity", CheckStatus::Skipped),
        ]);
        assert_eq!(failing.exit_code(), 2);
    }

    #[test]
    fn exit_code_reports_database_failures() {
        let failing = report(vec![
            ("config_validation", CheckStatus::Pass),
            ("replenishment_policy", CheckStatus::Pass),
            ("database_connectivity", CheckStatus::Pass),
            ("database_schema", CheckStatus::Fail),
        ]);
        assert_eq!(failing.exit_code(), 4);

        let passing = report(vec![("config_validation", CheckStatus::Pass)]);
        assert_eq!(passing.exit_code(), 0);
    }
}

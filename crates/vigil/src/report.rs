use std::fmt;
use std::future::Future;
use tracing::{error, info};
use vigil_engine::storefront::StepError;

#[derive(Debug, Clone, PartialEq)]
pub enum StepStatus {
    Passed(String),
    Failed { message: String, storefront: bool },
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub name: String,
    pub status: StepStatus,
}

/// Per-step outcome of one suite run.
///
/// The first failure stops the suite: later steps are recorded as skipped
/// without running.
#[derive(Debug, Clone)]
pub struct Report {
    suite: String,
    steps: Vec<StepRecord>,
}

impl Report {
    pub fn new(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            steps: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        !self.has_failure()
    }

    fn has_failure(&self) -> bool {
        self.steps
            .iter()
            .any(|s| matches!(s.status, StepStatus::Failed { .. }))
    }

    /// Run `work` unless an earlier step failed. `describe` turns the
    /// step's value into the detail shown next to a passed step.
    pub async fn step<T, Fut, S>(&mut self, name: &str, work: Fut, describe: S) -> Option<T>
    where
        Fut: Future<Output = Result<T, StepError>>,
        S: FnOnce(&T) -> String,
    {
        if self.has_failure() {
            self.record(name, StepStatus::Skipped);
            return None;
        }

        info!("Step: {}", name);
        match work.await {
            Ok(value) => {
                self.record(name, StepStatus::Passed(describe(&value)));
                Some(value)
            }
            Err(e) => {
                error!("Step '{}' failed: {}", name, e);
                self.record(
                    name,
                    StepStatus::Failed {
                        message: e.to_string(),
                        storefront: e.is_business(),
                    },
                );
                None
            }
        }
    }

    fn record(&mut self, name: &str, status: StepStatus) {
        self.steps.push(StepRecord {
            name: name.to_string(),
            status,
        });
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Suite: {}", self.suite)?;
        let (mut passed, mut failed, mut skipped) = (0, 0, 0);
        for step in &self.steps {
            match &step.status {
                StepStatus::Passed(detail) if detail.is_empty() => {
                    passed += 1;
                    writeln!(f, "  [PASS] {}", step.name)?;
                }
                StepStatus::Passed(detail) => {
                    passed += 1;
                    writeln!(f, "  [PASS] {} ({})", step.name, detail)?;
                }
                StepStatus::Failed {
                    message,
                    storefront,
                } => {
                    failed += 1;
                    let tag = if *storefront { "REJECTED" } else { "FAIL" };
                    writeln!(f, "  [{}] {}: {}", tag, step.name, message)?;
                }
                StepStatus::Skipped => {
                    skipped += 1;
                    writeln!(f, "  [SKIP] {}", step.name)?;
                }
            }
        }
        write!(
            f,
            "{} passed, {} failed, {} skipped",
            passed, failed, skipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_common::BusinessError;

    #[tokio::test]
    async fn test_failure_skips_remaining_steps() {
        let mut report = Report::new("shop");
        let price = report
            .step("sort", async { Ok::<_, StepError>(45.0) }, |p| {
                format!("first price {:.2}", p)
            })
            .await;
        assert_eq!(price, Some(45.0));

        let missing: Option<()> = report
            .step(
                "search",
                async { Err(StepError::Assertion("no results for 'bag'".into())) },
                |_| String::new(),
            )
            .await;
        assert!(missing.is_none());

        let mut ran = false;
        report
            .step(
                "verify",
                async {
                    ran = true;
                    Ok::<_, StepError>(())
                },
                |_| String::new(),
            )
            .await;
        assert!(!ran);
        assert!(!report.passed());
        assert_eq!(report.steps[2].status, StepStatus::Skipped);
    }

    #[tokio::test]
    async fn test_render_tags_storefront_rejections() {
        let mut report = Report::new("shop");
        report
            .step("log in", async { Ok::<_, StepError>(()) }, |_| String::new())
            .await;
        report
            .step(
                "add product",
                async {
                    Err::<(), _>(StepError::Business(BusinessError::classify(
                        "The requested qty is not available",
                    )))
                },
                |_| String::new(),
            )
            .await;
        report
            .step("verify cart", async { Ok::<_, StepError>(()) }, |_| String::new())
            .await;

        let rendered = report.to_string();
        assert!(rendered.contains("  [PASS] log in\n"));
        assert!(rendered.contains("[REJECTED] add product: "));
        assert!(rendered.contains("  [SKIP] verify cart"));
        assert!(rendered.ends_with("1 passed, 1 failed, 1 skipped"));
    }
}

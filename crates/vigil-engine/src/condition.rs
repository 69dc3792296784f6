use crate::driver::{Driver, DriverError};
use async_recursion::async_recursion;
use std::fmt;
use vigil_common::Locator;

/// A predicate over the current page state.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// At least one element matches the locator.
    Present(Locator),
    Visible(Locator),
    /// No matching element is visible. A missing or detached element counts.
    Hidden(Locator),
    /// Visible and enabled.
    Clickable(Locator),
    /// Trimmed text equals `text`, ignoring case.
    TextEquals { locator: Locator, text: String },
    TextContains { locator: Locator, text: String },
    AttributeContains {
        locator: Locator,
        name: String,
        value: String,
    },
    /// Number of matches falls within the inclusive bounds.
    Count {
        locator: Locator,
        min: Option<usize>,
        max: Option<usize>,
    },
    UrlContains(String),
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
    /// Like the inner condition, but an indeterminate result is an error
    /// instead of `false`.
    Strict(Box<Condition>),
}

impl Condition {
    pub fn present(locator: Locator) -> Self {
        Condition::Present(locator)
    }

    pub fn visible(locator: Locator) -> Self {
        Condition::Visible(locator)
    }

    pub fn hidden(locator: Locator) -> Self {
        Condition::Hidden(locator)
    }

    pub fn clickable(locator: Locator) -> Self {
        Condition::Clickable(locator)
    }

    pub fn text_equals(locator: Locator, text: impl Into<String>) -> Self {
        Condition::TextEquals {
            locator,
            text: text.into(),
        }
    }

    pub fn text_contains(locator: Locator, text: impl Into<String>) -> Self {
        Condition::TextContains {
            locator,
            text: text.into(),
        }
    }

    pub fn attribute_contains(
        locator: Locator,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Condition::AttributeContains {
            locator,
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn at_least(locator: Locator, min: usize) -> Self {
        Condition::Count {
            locator,
            min: Some(min),
            max: None,
        }
    }

    pub fn url_contains(fragment: impl Into<String>) -> Self {
        Condition::UrlContains(fragment.into())
    }

    pub fn negate(self) -> Self {
        Condition::Not(Box::new(self))
    }

    pub fn strict(self) -> Self {
        Condition::Strict(Box::new(self))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Present(l) => write!(f, "present({})", l),
            Condition::Visible(l) => write!(f, "visible({})", l),
            Condition::Hidden(l) => write!(f, "hidden({})", l),
            Condition::Clickable(l) => write!(f, "clickable({})", l),
            Condition::TextEquals { locator, text } => {
                write!(f, "text({}) == '{}'", locator, text)
            }
            Condition::TextContains { locator, text } => {
                write!(f, "text({}) contains '{}'", locator, text)
            }
            Condition::AttributeContains {
                locator,
                name,
                value,
            } => write!(f, "{}@{} contains '{}'", locator, name, value),
            Condition::Count { locator, min, max } => {
                write!(f, "count({})", locator)?;
                if let Some(min) = min {
                    write!(f, " >= {}", min)?;
                }
                if let Some(max) = max {
                    write!(f, " <= {}", max)?;
                }
                Ok(())
            }
            Condition::UrlContains(s) => write!(f, "url contains '{}'", s),
            Condition::All(cs) => write_list(f, "all", cs),
            Condition::Any(cs) => write_list(f, "any", cs),
            Condition::Not(c) => write!(f, "not({})", c),
            Condition::Strict(c) => write!(f, "strict({})", c),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, name: &str, conditions: &[Condition]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, c) in conditions.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", c)?;
    }
    write!(f, ")")
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConditionError {
    #[error("Could not evaluate '{condition}': {source}")]
    Indeterminate {
        condition: String,
        source: DriverError,
    },
    #[error("Driver failed while evaluating '{condition}': {source}")]
    Unexpected {
        condition: String,
        source: DriverError,
    },
}

impl ConditionError {
    /// The driver signal underneath.
    pub fn into_driver_error(self) -> DriverError {
        match self {
            ConditionError::Indeterminate { source, .. }
            | ConditionError::Unexpected { source, .. } => source,
        }
    }
}

/// Three-valued result of a single evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    True,
    False,
    /// The state could not be observed (element missing or detached).
    Indeterminate(DriverError),
}

impl Evaluation {
    fn from_bool(value: bool) -> Self {
        if value {
            Evaluation::True
        } else {
            Evaluation::False
        }
    }

    pub fn holds(&self) -> bool {
        matches!(self, Evaluation::True)
    }
}

/// Evaluates conditions against the live page. Stateless: evaluating the same
/// condition on an unchanged page gives the same answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate once. Indeterminate results count as `false` unless wrapped
    /// in [`Condition::Strict`]. Driver errors other than absence are errors.
    pub async fn evaluate<D: Driver>(
        &self,
        driver: &D,
        condition: &Condition,
    ) -> Result<bool, ConditionError> {
        Ok(self.probe(driver, condition).await?.holds())
    }

    #[async_recursion]
    pub async fn probe<D: Driver>(
        &self,
        driver: &D,
        condition: &Condition,
    ) -> Result<Evaluation, ConditionError> {
        match condition {
            Condition::All(conditions) => {
                for c in conditions {
                    let result = self.probe(driver, c).await?;
                    if !result.holds() {
                        return Ok(result);
                    }
                }
                Ok(Evaluation::True)
            }
            Condition::Any(conditions) => {
                let mut saw_false = conditions.is_empty();
                let mut indeterminate = None;
                for c in conditions {
                    match self.probe(driver, c).await? {
                        Evaluation::True => return Ok(Evaluation::True),
                        Evaluation::False => saw_false = true,
                        Evaluation::Indeterminate(e) => {
                            indeterminate.get_or_insert(e);
                        }
                    }
                }
                Ok(match indeterminate {
                    Some(e) if !saw_false => Evaluation::Indeterminate(e),
                    _ => Evaluation::False,
                })
            }
            Condition::Not(inner) => {
                // Indeterminate is false before negation.
                let result = self.probe(driver, inner).await?;
                Ok(Evaluation::from_bool(!result.holds()))
            }
            Condition::Strict(inner) => match self.probe(driver, inner).await? {
                Evaluation::Indeterminate(source) => Err(ConditionError::Indeterminate {
                    condition: inner.to_string(),
                    source,
                }),
                other => Ok(other),
            },
            Condition::UrlContains(fragment) => match driver.current_url().await {
                Ok(url) => Ok(Evaluation::from_bool(url.contains(fragment.as_str()))),
                Err(e) => unexpected(condition, e),
            },
            Condition::Count { locator, min, max } => {
                match driver.find_elements(locator).await {
                    Ok(elements) => {
                        let n = elements.len();
                        let above = min.is_none_or(|m| n >= m);
                        let below = max.is_none_or(|m| n <= m);
                        Ok(Evaluation::from_bool(above && below))
                    }
                    Err(e) if e.is_absence() => Ok(Evaluation::from_bool(min.unwrap_or(0) == 0)),
                    Err(e) => unexpected(condition, e),
                }
            }
            Condition::Present(locator) => match driver.find_element(locator).await {
                Ok(_) => Ok(Evaluation::True),
                Err(e) if e.is_absence() => Ok(Evaluation::False),
                Err(e) => unexpected(condition, e),
            },
            Condition::Hidden(locator) => {
                let visible = async {
                    let element = driver.find_element(locator).await?;
                    driver.is_visible(&element).await
                };
                match visible.await {
                    Ok(v) => Ok(Evaluation::from_bool(!v)),
                    Err(e) if e.is_absence() => Ok(Evaluation::True),
                    Err(e) => unexpected(condition, e),
                }
            }
            Condition::Visible(locator) => {
                let observed = async {
                    let element = driver.find_element(locator).await?;
                    driver.is_visible(&element).await
                };
                settle(condition, observed.await)
            }
            Condition::Clickable(locator) => {
                let observed = async {
                    let element = driver.find_element(locator).await?;
                    Ok::<_, DriverError>(
                        driver.is_visible(&element).await? && driver.is_enabled(&element).await?,
                    )
                };
                settle(condition, observed.await)
            }
            Condition::TextEquals { locator, text } => {
                let observed = async {
                    let element = driver.find_element(locator).await?;
                    let actual = driver.text(&element).await?;
                    Ok::<_, DriverError>(actual.trim().eq_ignore_ascii_case(text.trim()))
                };
                settle(condition, observed.await)
            }
            Condition::TextContains { locator, text } => {
                let observed = async {
                    let element = driver.find_element(locator).await?;
                    let actual = driver.text(&element).await?;
                    Ok::<_, DriverError>(actual.contains(text.as_str()))
                };
                settle(condition, observed.await)
            }
            Condition::AttributeContains {
                locator,
                name,
                value,
            } => {
                let observed = async {
                    let element = driver.find_element(locator).await?;
                    let actual = driver.attribute(&element, name).await?;
                    Ok::<_, DriverError>(actual.is_some_and(|a| a.contains(value.as_str())))
                };
                settle(condition, observed.await)
            }
        }
    }
}

fn settle(
    condition: &Condition,
    observed: Result<bool, DriverError>,
) -> Result<Evaluation, ConditionError> {
    match observed {
        Ok(v) => Ok(Evaluation::from_bool(v)),
        Err(e) if e.is_absence() => Ok(Evaluation::Indeterminate(e)),
        Err(e) => unexpected(condition, e),
    }
}

fn unexpected(condition: &Condition, source: DriverError) -> Result<Evaluation, ConditionError> {
    Err(ConditionError::Unexpected {
        condition: condition.to_string(),
        source,
    })
}

use fantoccini::error::CmdError;
use vigil_common::{DriverError, Locator};

/// Translate a WebDriver command failure into the engine's signal set.
pub fn map_cmd_error(err: CmdError, locator: Option<&Locator>) -> DriverError {
    classify(&err.to_string(), locator)
}

/// Classification by the W3C error message, which is all some drivers give
/// us reliably.
pub fn classify(message: &str, locator: Option<&Locator>) -> DriverError {
    let lowered = message.to_lowercase();
    if lowered.contains("no such element") || lowered.contains("unable to locate element") {
        DriverError::NotFound {
            locator: locator.map(|l| l.to_string()).unwrap_or_default(),
        }
    } else if lowered.contains("stale element reference")
        || lowered.contains("stale element not found")
    {
        DriverError::Stale
    } else if lowered.contains("element click intercepted")
        || lowered.contains("is not clickable at point")
    {
        DriverError::Intercepted(message.to_string())
    } else if lowered.contains("invalid session id") || lowered.contains("chrome not reachable") {
        DriverError::NotReady
    } else {
        DriverError::Other(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_such_element() {
        let err = classify(
            "no such element: Unable to locate element: {\"method\":\"css selector\",\"selector\":\"#email\"}",
            Some(&Locator::id("email")),
        );
        assert_eq!(err, DriverError::not_found("id=email"));
    }

    #[test]
    fn test_stale_element() {
        let err = classify(
            "stale element reference: stale element not found in the current frame",
            None,
        );
        assert_eq!(err, DriverError::Stale);
    }

    #[test]
    fn test_click_intercepted_keeps_message() {
        let msg = "element click intercepted: Element <button id=\"product-addtocart-button\"> is not clickable at point (812, 440). Other element would receive the click: <div class=\"loading-mask\">";
        assert_eq!(classify(msg, None), DriverError::Intercepted(msg.to_string()));
    }

    #[test]
    fn test_dead_session() {
        assert_eq!(
            classify("invalid session id", None),
            DriverError::NotReady
        );
    }

    #[test]
    fn test_other() {
        assert_eq!(
            classify("javascript error: boom", None),
            DriverError::Other("javascript error: boom".into())
        );
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AutofillError {
    /// Page helper subprocess failed to spawn
    #[error("Failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from / writing to the page helper failed
    #[error("Page session I/O error: {0}")]
    SessionIO(String),

    /// Page helper answered with ok=false or a malformed reply
    #[error("Page command '{command}' failed: {error}")]
    SessionProtocol { command: String, error: String },

    /// Page side answered a request with the wrong kind of response
    #[error("Unexpected page response to {request}: got {actual}")]
    UnexpectedResponse { request: String, actual: String },

    /// JSON parsing failed (helper output, relay reply)
    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization failed
    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Relay could not reach the inference endpoint (connect, timeout, body)
    #[error("Relay request to {endpoint} failed: {source}")]
    Relay {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Inference endpoint answered with a non-success status
    #[error("Relay endpoint {endpoint} answered with HTTP {status}")]
    RelayStatus { endpoint: String, status: u16 },

    /// Background relay worker is gone
    #[error("Bridge closed: {0}")]
    BridgeClosed(String),

    /// Structural locator string could not be parsed
    #[error("Invalid locator '{0}'")]
    InvalidLocator(String),
}

use may_minihttp::Response;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::io::Read;

/// The uniform response document of every generated handler.
///
/// `success` is true iff `code` is 200 iff `error` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: u16,
    pub data: Value,
    pub error: String,
    pub success: bool,
}

impl Envelope {
    pub fn success(data: Value) -> Self {
        Envelope {
            code: 200,
            data,
            error: String::new(),
            success: true,
        }
    }

    pub fn empty() -> Self {
        Envelope::success(Value::Null)
    }

    /// Failure envelope; an empty message is replaced so `error` is never blank.
    pub fn failure(code: u16, message: impl fmt::Display) -> Self {
        let mut error = message.to_string();
        if error.is_empty() {
            error = "unknown error".to_string();
        }
        Envelope {
            code,
            data: Value::Null,
            error,
            success: false,
        }
    }
}

/// What a handler hands back to the route table.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Envelope(Envelope),
    /// Payload that already is the complete response body
    Preformatted(Vec<u8>),
    /// Wrong HTTP method; answered without an envelope
    MethodNotAllowed,
}

impl Reply {
    pub fn empty() -> Self {
        Reply::Envelope(Envelope::empty())
    }

    /// Success envelope carrying `value` directly as `data`.
    pub fn data<T: Serialize + ?Sized>(value: &T) -> Self {
        match encode(value) {
            Ok(data) => Reply::Envelope(Envelope::success(data)),
            Err(err) => Reply::failure(format!("failed to encode result: {err}")),
        }
    }

    /// Success envelope whose `data` maps `result0..result{n-1}` to the values.
    pub fn indexed<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Result<Value, serde_json::Error>>,
    {
        let mut data = Map::new();
        for (index, value) in values.into_iter().enumerate() {
            match value {
                Ok(value) => {
                    data.insert(format!("result{index}"), value);
                }
                Err(err) => return Reply::failure(format!("failed to encode result{index}: {err}")),
            }
        }
        Reply::Envelope(Envelope::success(Value::Object(data)))
    }

    /// 500 envelope for an error returned by the wrapped function.
    pub fn failure(message: impl fmt::Display) -> Self {
        Reply::Envelope(Envelope::failure(500, message))
    }

    /// 400 envelope for a body that could not be read or decoded.
    pub fn bad_request(message: impl fmt::Display) -> Self {
        Reply::Envelope(Envelope::failure(400, message))
    }

    pub fn preformatted(payload: impl Into<Vec<u8>>) -> Self {
        Reply::Preformatted(payload.into())
    }

    pub fn method_not_allowed() -> Self {
        Reply::MethodNotAllowed
    }

    /// HTTP status this reply is written with.
    pub fn status(&self) -> u16 {
        match self {
            Reply::Envelope(envelope) => envelope.code,
            Reply::Preformatted(_) => 200,
            Reply::MethodNotAllowed => 405,
        }
    }

    pub fn envelope(&self) -> Option<&Envelope> {
        match self {
            Reply::Envelope(envelope) => Some(envelope),
            _ => None,
        }
    }

    /// Serialized response body.
    pub fn body(&self) -> Vec<u8> {
        match self {
            Reply::Envelope(envelope) => serde_json::to_vec(envelope).unwrap_or_else(|err| {
                format!(r#"{{"code":500,"data":null,"error":"{err}","success":false}}"#)
                    .into_bytes()
            }),
            Reply::Preformatted(payload) => payload.clone(),
            Reply::MethodNotAllowed => Vec::new(),
        }
    }

    pub fn write_to(self, res: &mut Response) {
        let status = self.status();
        res.status_code(status as usize, status_reason(status));
        match self {
            Reply::MethodNotAllowed => {
                res.header("Allow: POST");
            }
            Reply::Preformatted(payload) => {
                res.header("Content-Type: application/json");
                res.body_vec(payload);
            }
            envelope => {
                res.header("Content-Type: application/json");
                res.body_vec(envelope.body());
            }
        }
    }
}

pub(crate) fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

/// Read the whole request body.
pub fn read_body(body: &mut dyn Read) -> Result<Vec<u8>, Reply> {
    let mut bytes = Vec::new();
    body.read_to_end(&mut bytes)
        .map_err(|err| Reply::bad_request(format!("failed to read request body: {err}")))?;
    Ok(bytes)
}

/// Decode a request body into a handler's argument record.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Reply> {
    serde_json::from_slice(bytes).map_err(Reply::bad_request)
}

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(value)
}

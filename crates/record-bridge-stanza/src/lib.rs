//! Typed control-stanza models shared by `bridge` and transport adapters.
//!
//! The wire protocol is an addressed IQ stanza carrying one namespace-qualified
//! element:
//! - control requests: `<record xmlns=".." action="start|stop" streamid=".."
//!   url=".." follow-entity=".."/>` inside an `iq type="set"`
//! - replies: `iq type="result|error"` correlated by the request `id`, with an
//!   optional `state` attribute (`pending`/`stopping`) and, on error, a
//!   condition/text/code payload
//! - presence payload: `<record-status xmlns=".." status="idle|busy"/>`
//!
//! This crate only maps between the generic stanza shape and the typed
//! request/reply model; stream framing, auth, and delivery belong to the
//! transport layer.

use std::collections::BTreeMap;
use std::fmt;

use record_bridge_types::{ControllerStatus, PresenceState};

/// Namespace of the recording-control elements.
pub const NS_RECORDING: &str = "urn:xmpp:recording-control:1";
/// Element name of the control/status IQ payload.
pub const ELEM_CONTROL: &str = "record";
/// Element name of the presence status payload.
pub const ELEM_PRESENCE_STATUS: &str = "record-status";

pub const ATTR_ACTION: &str = "action";
pub const ATTR_STREAM_ID: &str = "streamid";
pub const ATTR_URL: &str = "url";
pub const ATTR_FOLLOW_ENTITY: &str = "follow-entity";
pub const ATTR_STATE: &str = "state";
pub const ATTR_STATUS: &str = "status";

/// Opaque remote address (bare or full JID); the bridge never interprets it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    pub fn new(addr: impl Into<String>) -> Self {
        Address(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque correlation token; replies must echo it unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        RequestId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generic namespace-qualified element with flat attributes.
///
/// Transport adapters convert their native stanza objects into this shape at
/// the boundary; everything past it is typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub namespace: String,
    attrs: BTreeMap<String, String>,
}

impl Element {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            namespace: namespace.into(),
            attrs: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IqType {
    Get,
    Set,
    Result,
    Error,
}

impl IqType {
    pub fn as_str(self) -> &'static str {
        match self {
            IqType::Get => "get",
            IqType::Set => "set",
            IqType::Result => "result",
            IqType::Error => "error",
        }
    }
}

/// An addressed IQ stanza as seen at the transport boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Iq {
    pub from: Address,
    pub to: Address,
    pub id: RequestId,
    pub kind: IqType,
    pub payload: Option<Element>,
    pub error: Option<ReplyError>,
}

/// Inbound control command, decoded from an `iq type="set"` stanza.
///
/// Attribute presence is preserved as-is; validation of required fields
/// (non-empty `stream_id`/`url` for start) is the handler's job, not the
/// parser's.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlRequest {
    pub from: Address,
    pub id: RequestId,
    pub action: ControlAction,
    pub stream_id: Option<String>,
    pub url: Option<String>,
    pub follow_entity: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlAction {
    Start,
    Stop,
    /// Anything else, including a missing attribute (empty string).
    Other(String),
}

impl ControlAction {
    fn from_attr(attr: Option<&str>) -> Self {
        match attr {
            Some("start") => ControlAction::Start,
            Some("stop") => ControlAction::Stop,
            Some(other) => ControlAction::Other(other.to_string()),
            None => ControlAction::Other(String::new()),
        }
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlAction::Start => f.write_str("start"),
            ControlAction::Stop => f.write_str("stop"),
            ControlAction::Other(raw) => f.write_str(raw),
        }
    }
}

impl ControlRequest {
    /// Decode a control request from an inbound IQ.
    ///
    /// Fails only on structural problems (wrong type, missing or foreign
    /// payload element). An unknown `action` still parses; the handler
    /// answers it with a not-implemented error.
    pub fn from_iq(iq: &Iq) -> Result<Self, ParseError> {
        if iq.kind != IqType::Set {
            return Err(ParseError::NotASet(iq.kind));
        }
        let payload = iq.payload.as_ref().ok_or(ParseError::MissingPayload)?;
        if payload.name != ELEM_CONTROL || payload.namespace != NS_RECORDING {
            return Err(ParseError::ForeignPayload {
                name: payload.name.clone(),
                namespace: payload.namespace.clone(),
            });
        }
        Ok(ControlRequest {
            from: iq.from.clone(),
            id: iq.id.clone(),
            action: ControlAction::from_attr(payload.attr(ATTR_ACTION)),
            stream_id: payload.attr(ATTR_STREAM_ID).map(str::to_string),
            url: payload.attr(ATTR_URL).map(str::to_string),
            follow_entity: payload.attr(ATTR_FOLLOW_ENTITY).map(str::to_string),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyKind {
    Result,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCondition {
    ServiceUnavailable,
    NotImplemented,
    BadRequest,
}

impl ErrorCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCondition::ServiceUnavailable => "service-unavailable",
            ErrorCondition::NotImplemented => "not-implemented",
            ErrorCondition::BadRequest => "bad-request",
        }
    }
}

/// Error payload of an error-type reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyError {
    pub condition: ErrorCondition,
    pub text: String,
    /// Legacy numeric code (503 on admission conflict), carried for
    /// controllers that still key on it.
    pub code: Option<u16>,
}

/// State hint attached to a successful reply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StateHint {
    Pending,
    Stopping,
    #[default]
    None,
}

impl StateHint {
    pub fn as_attr(self) -> Option<&'static str> {
        match self {
            StateHint::Pending => Some("pending"),
            StateHint::Stopping => Some("stopping"),
            StateHint::None => None,
        }
    }
}

/// Outbound reply, correlated 1:1 with the triggering request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlReply {
    pub to: Address,
    pub id: RequestId,
    pub kind: ReplyKind,
    pub error: Option<ReplyError>,
    pub state: StateHint,
}

impl ControlReply {
    /// Build a result-type reply echoing the request's id and sender.
    pub fn result(request: &ControlRequest, state: StateHint) -> Self {
        ControlReply {
            to: request.from.clone(),
            id: request.id.clone(),
            kind: ReplyKind::Result,
            error: None,
            state,
        }
    }

    /// Build an error-type reply echoing the request's id and sender.
    pub fn error(request: &ControlRequest, condition: ErrorCondition, text: impl Into<String>) -> Self {
        ControlReply {
            to: request.from.clone(),
            id: request.id.clone(),
            kind: ReplyKind::Error,
            error: Some(ReplyError {
                condition,
                text: text.into(),
                code: None,
            }),
            state: StateHint::None,
        }
    }

    pub fn with_code(mut self, code: u16) -> Self {
        if let Some(err) = self.error.as_mut() {
            err.code = Some(code);
        }
        self
    }

    /// Encode into the IQ shape the transport sends on the wire.
    pub fn into_iq(self, own_address: Address) -> Iq {
        let kind = match self.kind {
            ReplyKind::Result => IqType::Result,
            ReplyKind::Error => IqType::Error,
        };
        let payload = self.state.as_attr().map(|state| {
            Element::new(ELEM_CONTROL, NS_RECORDING).with_attr(ATTR_STATE, state)
        });
        Iq {
            from: own_address,
            to: self.to,
            id: self.id,
            kind,
            payload,
            error: self.error,
        }
    }
}

/// Presence payload element carrying the bridge's availability.
pub fn presence_status_element(state: PresenceState) -> Element {
    Element::new(ELEM_PRESENCE_STATUS, NS_RECORDING).with_attr(ATTR_STATUS, state.as_str())
}

/// Payload of a status IQ addressed directly to the controller.
pub fn controller_status_element(status: ControllerStatus) -> Element {
    Element::new(ELEM_CONTROL, NS_RECORDING).with_attr(ATTR_STATUS, status.as_str())
}

/// Structural decode failure at the protocol boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    NotASet(IqType),
    MissingPayload,
    ForeignPayload { name: String, namespace: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NotASet(kind) => write!(f, "expected iq type=set, got {}", kind.as_str()),
            ParseError::MissingPayload => f.write_str("iq carries no payload element"),
            ParseError::ForeignPayload { name, namespace } => {
                write!(f, "unexpected payload element {name} (xmlns {namespace})")
            }
        }
    }
}

impl std::error::Error for ParseError {}

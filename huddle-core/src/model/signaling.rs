use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

impl SdpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::Answer => "answer",
        }
    }
}

/// A validated session description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDescription {
    pub kind: SdpKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }
}

/// Session description as it travels over the relay (`{"type", "sdp"}`).
///
/// Both fields are optional on the wire so that a malformed blob still reaches
/// the signaling state machine, which rejects it per peer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdpBlob {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp: Option<String>,
}

impl SdpBlob {
    pub fn into_description(self, expected: SdpKind) -> Result<SessionDescription, String> {
        match self.kind.as_deref() {
            Some(kind) if kind == expected.as_str() => {}
            Some(other) => return Err(format!("expected {} but got {other:?}", expected.as_str())),
            None => return Err(format!("{} is missing its type", expected.as_str())),
        }

        match self.sdp {
            Some(sdp) if !sdp.trim().is_empty() => Ok(SessionDescription { kind: expected, sdp }),
            _ => Err(format!("{} has no sdp", expected.as_str())),
        }
    }
}

impl From<SessionDescription> for SdpBlob {
    fn from(desc: SessionDescription) -> Self {
        Self {
            kind: Some(desc.kind.as_str().to_owned()),
            sdp: Some(desc.sdp),
        }
    }
}

/// A validated ICE candidate, shaped like the browser's `RTCIceCandidateInit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    pub sdp_mid: Option<String>,
    pub sdp_m_line_index: Option<u16>,
}

impl IceCandidate {
    pub fn new(candidate: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            sdp_mid: None,
            sdp_m_line_index: None,
        }
    }
}

/// Wire form of [`IceCandidate`]; see [`SdpBlob`] for why fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateBlob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_m_line_index: Option<u16>,
}

impl CandidateBlob {
    pub fn into_candidate(self) -> Result<IceCandidate, String> {
        let Some(candidate) = self.candidate else {
            return Err("ice candidate has no candidate line".to_owned());
        };
        if self.sdp_mid.is_none() && self.sdp_m_line_index.is_none() {
            return Err("ice candidate has neither sdpMid nor sdpMLineIndex".to_owned());
        }

        Ok(IceCandidate {
            candidate,
            sdp_mid: self.sdp_mid,
            sdp_m_line_index: self.sdp_m_line_index,
        })
    }
}

impl From<IceCandidate> for CandidateBlob {
    fn from(c: IceCandidate) -> Self {
        Self {
            candidate: Some(c.candidate),
            sdp_mid: c.sdp_mid,
            sdp_m_line_index: c.sdp_m_line_index,
        }
    }
}

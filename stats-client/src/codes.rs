//! Fixed code vocabularies accepted by the monitoring backend.
//!
//! The backend identifies WebRTC operations, fabric events, and transport
//! usage modes by short string codes. Each vocabulary is a closed enum so an
//! unrepresentable code cannot reach the wire; parsing a name that is not in
//! the vocabulary fails loudly instead of sending an undefined code.

use std::str::FromStr;

use crate::error::ClientError;

/// Monitored WebRTC operations an error can be attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebRtcFunction {
    /// Offer creation during negotiation.
    CreateOffer,
    /// Answer creation during negotiation.
    CreateAnswer,
}

impl WebRtcFunction {
    /// Stable wire code for this function.
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::CreateOffer => "createOffer",
            Self::CreateAnswer => "createAnswer",
        }
    }
}

impl std::fmt::Display for WebRtcFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

impl FromStr for WebRtcFunction {
    type Err = ClientError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "createOffer" => Ok(Self::CreateOffer),
            "createAnswer" => Ok(Self::CreateAnswer),
            other => Err(ClientError::UnknownFunction(other.to_string())),
        }
    }
}

/// Fabric events reportable against a registered connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FabricEvent {
    ScreenShareStart,
    ScreenShareStop,
    AudioMute,
    AudioUnmute,
    VideoPause,
    VideoResume,
    /// The connection's fabric is being torn down.
    FabricTerminated,
}

impl FabricEvent {
    /// Stable wire code for this event.
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::ScreenShareStart => "screenShareStart",
            Self::ScreenShareStop => "screenShareStop",
            Self::AudioMute => "audioMute",
            Self::AudioUnmute => "audioUnmute",
            Self::VideoPause => "videoPause",
            Self::VideoResume => "videoResume",
            Self::FabricTerminated => "fabricTerminated",
        }
    }
}

impl std::fmt::Display for FabricEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

impl FromStr for FabricEvent {
    type Err = ClientError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "screenShareStart" => Ok(Self::ScreenShareStart),
            "screenShareStop" => Ok(Self::ScreenShareStop),
            "audioMute" => Ok(Self::AudioMute),
            "audioUnmute" => Ok(Self::AudioUnmute),
            "videoPause" => Ok(Self::VideoPause),
            "videoResume" => Ok(Self::VideoResume),
            "fabricTerminated" => Ok(Self::FabricTerminated),
            other => Err(ClientError::UnknownEvent(other.to_string())),
        }
    }
}

/// How a registered transport carries its media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportUsage {
    /// One transport carries multiple media streams on the same port.
    Multiplex,
    /// Audio-only transport.
    Audio,
    /// Video-only transport.
    Video,
    /// Screen-share transport.
    ScreenShare,
    /// Data-channel transport.
    Data,
}

impl TransportUsage {
    /// Stable wire code for this usage mode.
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Multiplex => "multiplex",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::ScreenShare => "screen",
            Self::Data => "data",
        }
    }
}

impl std::fmt::Display for TransportUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_codes_are_stable() {
        assert_eq!(WebRtcFunction::CreateOffer.as_code(), "createOffer");
        assert_eq!(WebRtcFunction::CreateAnswer.as_code(), "createAnswer");
    }

    #[test]
    fn function_parse_fails_loudly_on_unknown_name() {
        assert_eq!(
            "createOffer".parse::<WebRtcFunction>().unwrap(),
            WebRtcFunction::CreateOffer
        );

        let err = "iceRestart".parse::<WebRtcFunction>().unwrap_err();
        assert!(matches!(err, ClientError::UnknownFunction(name) if name == "iceRestart"));
    }

    #[test]
    fn event_parse_fails_loudly_on_unknown_name() {
        assert_eq!(
            "fabricTerminated".parse::<FabricEvent>().unwrap(),
            FabricEvent::FabricTerminated
        );

        let err = "dominantSpeaker".parse::<FabricEvent>().unwrap_err();
        assert!(matches!(err, ClientError::UnknownEvent(name) if name == "dominantSpeaker"));
    }

    #[test]
    fn usage_codes_are_stable() {
        assert_eq!(TransportUsage::Multiplex.as_code(), "multiplex");
        assert_eq!(TransportUsage::ScreenShare.as_code(), "screen");
    }
}

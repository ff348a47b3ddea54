/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Chat(String),
    Mute,
    Unmute,
    VideoOn,
    VideoOff,
    Participants,
    Leave,
    Help,
    Unknown(String),
    Empty,
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(command) = line.strip_prefix('/') else {
            return Self::Chat(line.to_owned());
        };

        match command.trim().to_ascii_lowercase().as_str() {
            "mute" => Self::Mute,
            "unmute" => Self::Unmute,
            "video-on" => Self::VideoOn,
            "video-off" => Self::VideoOff,
            "who" | "participants" => Self::Participants,
            "leave" | "quit" | "exit" => Self::Leave,
            "help" | "?" => Self::Help,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

pub const HELP: &str = "\
/mute, /unmute        toggle the microphone
/video-on, /video-off toggle the camera
/who                  list participants
/leave                leave the room and exit
anything else is sent as a chat message";

use colored::*;
use huddle_client::{ConnectionStatus, Participant, UiEvent};
use huddle_core::MediaState;

fn media_flags(media: &MediaState) -> String {
    let audio = if media.audio_enabled { "mic on" } else { "muted" };
    let video = if media.video_enabled { "cam on" } else { "cam off" };
    format!("{}, {}", audio, video)
}

fn status_label(status: ConnectionStatus) -> ColoredString {
    match status {
        ConnectionStatus::Waiting => "waiting".dimmed(),
        ConnectionStatus::Connecting => "connecting".yellow(),
        ConnectionStatus::Connected => "connected".green(),
        ConnectionStatus::Disconnected => "disconnected".red(),
    }
}

pub fn event(event: &UiEvent) -> String {
    match event {
        UiEvent::RoomEntered {
            room_code,
            participants,
        } => format!(
            "{} {} ({} in room)",
            "Joined room".green().bold(),
            room_code.as_str().bold(),
            participants.len()
        ),
        UiEvent::RoomLeft { room_code } => {
            format!("{} {}", "Left room".yellow(), room_code)
        }
        UiEvent::ParticipantJoined(name) => format!("{} {}", "+".green(), name),
        UiEvent::ParticipantLeft(name) => format!("{} {}", "-".red(), name),
        UiEvent::ParticipantStatus { username, status } => {
            format!("  {} is {}", username, status_label(*status))
        }
        UiEvent::RemoteMediaState { username, media } => {
            format!("  {} ({})", username, media_flags(media).dimmed())
        }
        UiEvent::LocalMediaState(media) => {
            format!("  you ({})", media_flags(media).dimmed())
        }
        UiEvent::ChatMessage(message) => {
            format!("{} {}", format!("<{}>", message.sender).cyan(), message.text)
        }
        UiEvent::Error(e) => format!("{} {}", "error:".red().bold(), e),
    }
}

pub fn participants(participants: &[Participant]) -> String {
    participants
        .iter()
        .map(|p| {
            format!(
                "  {} [{}] ({})",
                p.username.as_str().bold(),
                status_label(p.status),
                media_flags(&p.media)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// High-level phase of a play session.
///
/// The store accepts any transition and reports it; which transitions are
/// sensible is the orchestrator's concern. `Gameover` is terminal only by
/// convention; `reset` moves back to `Lobby`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Lobby,
    Drawing,
    Viewing,
    Voting,
    Result,
    Gameover,
}

impl GamePhase {
    /// Maps a backend phase string onto the client enum. The backend reports
    /// `"active"` for a running round; unknown values fall back to `Viewing`
    /// rather than failing.
    pub fn from_wire(phase: &str) -> Self {
        match phase {
            "lobby" => Self::Lobby,
            "drawing" => Self::Drawing,
            "viewing" | "active" => Self::Viewing,
            "voting" => Self::Voting,
            "result" => Self::Result,
            "gameover" => Self::Gameover,
            _ => Self::Viewing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_maps_to_viewing() {
        assert_eq!(GamePhase::from_wire("active"), GamePhase::Viewing);
    }

    #[test]
    fn unknown_phase_falls_back_to_viewing() {
        assert_eq!(GamePhase::from_wire("intermission"), GamePhase::Viewing);
    }
}

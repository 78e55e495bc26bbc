//! Application state and logic.

use super::input::move_cursor;
use anyhow::Result;
use crossterm::event::KeyCode;
use strictly_minimax::{
    ExternalInputStrategy, FirstPlayer, GameConfig, GameSession, GameStatus, Mark, Move,
    MoveSender, SearchStrategy, SessionSnapshot, SessionState, Strategy,
};
use tracing::{debug, info, instrument};

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep running.
    Continue,
    /// Leave the UI.
    Quit,
}

/// Main application state.
pub struct App {
    session: GameSession,
    config: GameConfig,
    seating: FirstPlayer,
    human: Option<MoveSender>,
    cursor: Move,
    notice: Option<String>,
}

impl App {
    /// Creates a new application. No game runs until [`App::new_game`].
    pub fn new(config: GameConfig) -> Self {
        Self {
            session: GameSession::new(),
            seating: *config.first_player(),
            config,
            human: None,
            cursor: Move::new(1, 1),
            notice: None,
        }
    }

    /// Current session snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Cell under the cursor.
    pub fn cursor(&self) -> Move {
        self.cursor
    }

    /// Mark played by the human.
    pub fn human_mark(&self) -> Mark {
        match self.seating {
            FirstPlayer::Human => Mark::X,
            FirstPlayer::Computer => Mark::O,
        }
    }

    /// Starts a new game with the current seating.
    #[instrument(skip(self), fields(seating = self.seating.label()))]
    pub async fn new_game(&mut self) -> Result<()> {
        let (human, sender) = ExternalInputStrategy::channel("Human");
        let computer = match self.config.seed() {
            Some(seed) => SearchStrategy::with_seed("Computer", *seed),
            None => SearchStrategy::new("Computer"),
        }
        .with_think_time(self.config.think_time());

        let (first, second): (Box<dyn Strategy>, Box<dyn Strategy>) = match self.seating {
            FirstPlayer::Human => (Box::new(human), Box::new(computer)),
            FirstPlayer::Computer => (Box::new(computer), Box::new(human)),
        };

        self.session.start_new_game(first, second).await?;
        self.human = Some(sender);
        self.notice = None;
        info!("Started new game");
        Ok(())
    }

    /// Aborts the running game.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.session.abort().await?;
        Ok(())
    }

    /// Handles a key press.
    #[instrument(skip(self))]
    pub async fn handle_key(&mut self, key: KeyCode) -> Result<Flow> {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Flow::Quit),
            KeyCode::Char('n') => self.new_game().await?,
            KeyCode::Char('s') => {
                self.seating = self.seating.toggle();
                self.new_game().await?;
            }
            KeyCode::Char(c) => {
                if let Some(mv) = c.to_digit(10).and_then(Move::from_keypad) {
                    self.cursor = mv;
                    self.submit(mv);
                }
            }
            KeyCode::Enter => self.submit(self.cursor),
            other => self.cursor = move_cursor(self.cursor, other),
        }
        Ok(Flow::Continue)
    }

    /// Hands a move to the human strategy if it is the human's turn.
    fn submit(&mut self, mv: Move) {
        let snapshot = self.session.snapshot();
        if snapshot.to_move() != Some(self.human_mark()) {
            debug!(%mv, "Ignoring input outside the human's turn");
            return;
        }
        if !snapshot.board().is_available(mv.x, mv.y) {
            self.notice = Some("That square is taken".to_string());
            return;
        }

        self.notice = None;
        if let Some(sender) = &self.human {
            sender.try_submit(mv);
        }
    }

    /// One-line status for the current snapshot.
    pub fn status_line(&self, snapshot: &SessionSnapshot) -> String {
        if let Some(notice) = &self.notice {
            return notice.clone();
        }
        status_text(snapshot, self.human_mark())
    }
}

/// Describes the game from the human's point of view.
fn status_text(snapshot: &SessionSnapshot, human: Mark) -> String {
    match snapshot.state() {
        SessionState::Idle => "No game running. Press 'n' to start.".to_string(),
        SessionState::Aborted => "Game aborted. Press 'n' for a new game.".to_string(),
        SessionState::Running | SessionState::Finished => {
            board_text(snapshot.board().status(), snapshot.board().next_mark(), human)
        }
    }
}

fn board_text(status: GameStatus, next: Mark, human: Mark) -> String {
    match status {
        GameStatus::InProgress if next == human => format!("Your turn ({})", human),
        GameStatus::InProgress => "Computer is thinking...".to_string(),
        GameStatus::Won(mark) if mark == human => {
            format!("You won ({}). Press 'n' for a new game.", mark)
        }
        GameStatus::Won(mark) => format!("Computer won ({}). Press 'n' for a new game.", mark),
        GameStatus::Draw => "Game drawn. Press 'n' for a new game.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_status() {
        let session = GameSession::new();
        assert_eq!(
            status_text(&session.snapshot(), Mark::X),
            "No game running. Press 'n' to start."
        );
    }

    #[test]
    fn test_win_status_names_the_winner() {
        let won = GameStatus::Won(Mark::O);
        assert_eq!(
            board_text(won, Mark::X, Mark::O),
            "You won (O). Press 'n' for a new game."
        );
        assert_eq!(
            board_text(won, Mark::X, Mark::X),
            "Computer won (O). Press 'n' for a new game."
        );
        assert_eq!(board_text(GameStatus::InProgress, Mark::O, Mark::O), "Your turn (O)");
    }

    #[test]
    fn test_human_mark_follows_seating() {
        let mut config = GameConfig::default();
        assert_eq!(App::new(config.clone()).human_mark(), Mark::X);
        config.set_first_player(FirstPlayer::Computer);
        assert_eq!(App::new(config).human_mark(), Mark::O);
    }

    #[tokio::test]
    async fn test_human_move_reaches_board() {
        let mut config = GameConfig::default();
        config.set_think_time_ms(0);
        let mut app = App::new(config);
        app.new_game().await.unwrap();

        let mut updates = app.session.subscribe();
        app.handle_key(KeyCode::Char('5')).await.unwrap();
        updates
            .wait_for(|snapshot| snapshot.board().round() >= 1)
            .await
            .unwrap();

        assert_eq!(app.snapshot().board().get(1, 1), Some(Mark::X));
        assert_eq!(app.handle_key(KeyCode::Char('q')).await.unwrap(), Flow::Quit);
        app.shutdown().await.unwrap();
    }
}

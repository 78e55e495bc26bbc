//! Tests for game session orchestration.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use strictly_minimax::{
    AbortSignal, Board, ExternalInputStrategy, GameSession, Mark, Move, SearchStrategy,
    SessionSnapshot, SessionState, Strategy,
};
use tokio::sync::watch;
use tokio::time::timeout;

const LIMIT: Duration = Duration::from_secs(5);

fn search(name: &str, seed: u64) -> Box<dyn Strategy> {
    Box::new(SearchStrategy::with_seed(name, seed).with_think_time(Duration::ZERO))
}

async fn wait_until(
    updates: &mut watch::Receiver<SessionSnapshot>,
    condition: impl FnMut(&SessionSnapshot) -> bool,
) {
    timeout(LIMIT, updates.wait_for(condition))
        .await
        .expect("session did not reach the expected state")
        .expect("session dropped");
}

/// Plays the first available cell and records the rounds it was asked at.
struct Recorder {
    name: String,
    mark: Option<Mark>,
    seen: Arc<Mutex<Vec<(Mark, usize)>>>,
}

#[async_trait::async_trait]
impl Strategy for Recorder {
    fn assign(&mut self, mark: Mark) {
        self.mark = Some(mark);
    }

    async fn next_move(&mut self, board: &Board, _abort: &AbortSignal) -> Option<Move> {
        let mark = self.mark.expect("mark assigned before first turn");
        self.seen.lock().unwrap().push((mark, board.round()));
        board.available_moves().first().copied()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Holds its move until the game is aborted, then returns it anyway.
struct Stubborn;

#[async_trait::async_trait]
impl Strategy for Stubborn {
    fn assign(&mut self, _mark: Mark) {}

    async fn next_move(&mut self, _board: &Board, abort: &AbortSignal) -> Option<Move> {
        abort.aborted().await;
        Some(Move::new(0, 0))
    }

    fn name(&self) -> &str {
        "stubborn"
    }
}

/// Panics on its first turn.
struct Faulty;

#[async_trait::async_trait]
impl Strategy for Faulty {
    fn assign(&mut self, _mark: Mark) {}

    async fn next_move(&mut self, board: &Board, _abort: &AbortSignal) -> Option<Move> {
        if !board.is_finished() {
            panic!("strategy fault");
        }
        None
    }

    fn name(&self) -> &str {
        "faulty"
    }
}

#[tokio::test]
async fn test_search_self_play_draws() {
    let mut session = GameSession::new();

    for seed in 0..3 {
        session
            .start_new_game(search("X", seed), search("O", seed + 50))
            .await
            .unwrap();
        let result = timeout(LIMIT, session.wait()).await.unwrap().unwrap();

        assert_eq!(*result.state(), SessionState::Finished);
        assert!(result.board().is_draw());
        assert_eq!(result.board().round(), 9);
        assert_eq!(result.player(Mark::X), "X");
        assert_eq!(result.player(Mark::O), "O");
    }
}

#[tokio::test]
async fn test_turns_alternate_by_round() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = |name: &str| -> Box<dyn Strategy> {
        Box::new(Recorder {
            name: name.to_string(),
            mark: None,
            seen: Arc::clone(&seen),
        })
    };

    let mut session = GameSession::new();
    session
        .start_new_game(recorder("first"), recorder("second"))
        .await
        .unwrap();
    let result = timeout(LIMIT, session.wait()).await.unwrap().unwrap();

    // First-available play: X completes the anti-diagonal with its fourth move.
    assert_eq!(result.board().winner(), Some(Mark::X));
    assert_eq!(result.board().round(), 7);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 7);
    for (i, (mark, round)) in seen.iter().enumerate() {
        assert_eq!(*round, i);
        assert_eq!(*mark, Mark::from_index(*round));
    }
}

#[tokio::test]
async fn test_external_moves_are_validated() {
    let (human, sender) = ExternalInputStrategy::channel("human");
    let mut session = GameSession::new();
    let mut updates = session.subscribe();
    session
        .start_new_game(Box::new(human), search("computer", 1))
        .await
        .unwrap();

    // Out of range: rejected, the human is asked again.
    assert!(sender.submit(Move::new(3, 1)).await);
    assert!(sender.submit(Move::new(1, 1)).await);
    wait_until(&mut updates, |s| s.board().round() >= 2).await;

    let snapshot = session.snapshot();
    assert_eq!(snapshot.board().get(1, 1), Some(Mark::X));
    assert_eq!(snapshot.to_move(), Some(Mark::X));
    let (mark, _) = snapshot.last_move().unwrap();
    assert_eq!(mark, Mark::O);

    // Occupied: rejected without touching the board.
    assert!(sender.submit(Move::new(1, 1)).await);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(session.snapshot().board().round(), 2);

    session.abort().await.unwrap();
    assert_eq!(*session.snapshot().state(), SessionState::Aborted);
}

#[tokio::test]
async fn test_abort_wakes_waiting_human() {
    let (human, _sender) = ExternalInputStrategy::channel("human");
    let mut session = GameSession::new();
    session
        .start_new_game(Box::new(human), search("computer", 2))
        .await
        .unwrap();
    assert!(session.is_running());

    timeout(LIMIT, session.abort()).await.unwrap().unwrap();

    let snapshot = session.snapshot();
    assert_eq!(*snapshot.state(), SessionState::Aborted);
    assert_eq!(snapshot.board().round(), 0);
    assert_eq!(snapshot.to_move(), None);
    assert!(!session.is_running());
}

#[tokio::test]
async fn test_move_returned_after_abort_is_discarded() {
    let mut session = GameSession::new();
    session
        .start_new_game(Box::new(Stubborn), search("computer", 3))
        .await
        .unwrap();

    timeout(LIMIT, session.abort()).await.unwrap().unwrap();

    let snapshot = session.snapshot();
    assert_eq!(*snapshot.state(), SessionState::Aborted);
    assert_eq!(snapshot.board().get(0, 0), None);
    assert_eq!(snapshot.board().round(), 0);
}

#[tokio::test]
async fn test_disconnected_input_aborts_game() {
    let (human, sender) = ExternalInputStrategy::channel("human");
    drop(sender);

    let mut session = GameSession::new();
    session
        .start_new_game(Box::new(human), search("computer", 4))
        .await
        .unwrap();
    let result = timeout(LIMIT, session.wait()).await.unwrap().unwrap();

    assert_eq!(*result.state(), SessionState::Aborted);
    assert_eq!(result.board().round(), 0);
}

#[tokio::test]
async fn test_new_game_replaces_running_game() {
    let (human, sender) = ExternalInputStrategy::channel("human");
    let mut session = GameSession::new();
    session
        .start_new_game(search("computer", 5), Box::new(human))
        .await
        .unwrap();

    let mut updates = session.subscribe();
    wait_until(&mut updates, |s| s.board().round() == 1).await;

    session
        .start_new_game(search("A", 6), search("B", 7))
        .await
        .unwrap();

    // The old human strategy is gone with the old game.
    assert!(!sender.submit(Move::new(0, 0)).await);

    let result = timeout(LIMIT, session.wait()).await.unwrap().unwrap();
    assert_eq!(*result.state(), SessionState::Finished);
    assert_eq!(result.player(Mark::X), "A");
    assert!(result.board().is_draw());
}

#[tokio::test]
async fn test_observers_see_rounds_in_order() {
    let mut session = GameSession::new();
    let mut updates = session.subscribe();
    session
        .start_new_game(search("X", 8), search("O", 9))
        .await
        .unwrap();

    let mut rounds = Vec::new();
    let last = timeout(LIMIT, async {
        loop {
            let snapshot = updates.borrow_and_update().clone();
            rounds.push(snapshot.board().round());
            if *snapshot.state() == SessionState::Finished {
                return snapshot;
            }
            updates.changed().await.expect("session dropped");
        }
    })
    .await
    .expect("game did not finish");

    assert!(rounds.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(rounds.last(), Some(&9));
    let (mark, mv) = last.last_move().unwrap();
    assert_eq!(mark, Mark::X);
    assert_eq!(last.board().get(mv.x, mv.y), Some(Mark::X));
}

#[tokio::test]
async fn test_dropping_session_releases_waiting_human() {
    let (human, sender) = ExternalInputStrategy::channel("human");
    let mut session = GameSession::new();
    let mut updates = session.subscribe();
    session
        .start_new_game(Box::new(human), search("computer", 10))
        .await
        .unwrap();

    drop(session);

    wait_until(&mut updates, |s| *s.state() == SessionState::Aborted).await;
    assert_eq!(updates.borrow().board().round(), 0);

    // Once the loop exits the receiver is gone and submissions fail.
    let rejected = timeout(LIMIT, async {
        while sender.submit(Move::new(0, 0)).await {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(rejected.is_ok(), "sender still accepted moves");
}

#[tokio::test]
async fn test_panicking_strategy_surfaces_as_error() {
    let mut session = GameSession::new();
    session
        .start_new_game(Box::new(Faulty), search("computer", 11))
        .await
        .unwrap();

    let err = timeout(LIMIT, session.wait())
        .await
        .unwrap()
        .expect_err("panicked loop should be an error");
    assert!(err.message.contains("Game loop failed"));

    let snapshot = session.snapshot();
    assert_eq!(*snapshot.state(), SessionState::Aborted);
    assert_eq!(snapshot.board().round(), 0);
    assert!(!session.is_running());
}

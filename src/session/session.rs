use super::*;
use crate::Config;
use crate::MoveNumber;
use crate::cards::*;
use crate::engine::*;
use crate::error::Error;
use crate::error::Result;
use crate::outcome::Outcome;
use crate::save::Snapshot;
use crate::settlement::*;
use crate::transport::Transport;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::VecDeque;
use std::sync::Arc;

/// Orchestrates one channel's worth of hands against a game engine.
///
/// Every input becomes an [`Event`] on a FIFO queue. Events are handled one
/// at a time; after each, the engine is polled until it reports no further
/// progress, and everything that changed is published to observers as a
/// [`Delta`]. The session is the engine's only caller and takes `&mut self`
/// for anything that reaches it, so no two engine calls can overlap.
///
/// Lifecycle: [`Session::new`], then [`Session::open`] (fresh channel) or
/// [`Session::resume`] (from a [`Snapshot`]), then [`Session::push`] until
/// [`Session::is_finished`]. Peer messages pushed before the engine exists are
/// held and delivered right after it is created or restored.
///
/// A local [`Event::ShutDown`] starts a cooperative close: the engine is told
/// once, observers see the terminal state, and local play is refused. Peer
/// messages and blocks keep flowing to the engine until a poll reports it
/// finished, since the close itself needs the peer's answer and the closing
/// block.
pub struct Session {
    config: Config,
    engine: Box<dyn Engine>,
    transport: Arc<dyn Transport>,
    relay: Relay,
    observers: Observers,
    queue: VecDeque<Event>,
    held: Vec<String>,
    rng: SmallRng,
    move_number: MoveNumber,
    my_turn: bool,
    handshake_done: bool,
    opened: bool,
    closing: bool,
    finished: bool,
    engine_finished: bool,
    torn_down: bool,
    announced: bool,
    card_selections: Selection,
    player_hand: Vec<Card>,
    opponent_hand: Vec<Card>,
    game_ids: Vec<GameId>,
    result: Option<GameResult>,
    outcome: Option<Outcome>,
}

impl Session {
    pub fn new(
        config: Config,
        engine: Box<dyn Engine>,
        transport: Arc<dyn Transport>,
        settlement: Arc<dyn Settlement>,
    ) -> Self {
        let observers = Observers::default();
        let relay = Relay::new(settlement, observers.clone(), config.retry());
        Self {
            config,
            engine,
            transport,
            relay,
            observers,
            queue: VecDeque::new(),
            held: Vec::new(),
            rng: SmallRng::from_os_rng(),
            move_number: 0,
            my_turn: false,
            handshake_done: false,
            opened: false,
            closing: false,
            finished: false,
            engine_finished: false,
            torn_down: false,
            announced: false,
            card_selections: Selection::empty(),
            player_hand: Vec::new(),
            opponent_hand: Vec::new(),
            game_ids: Vec::new(),
            result: None,
            outcome: None,
        }
    }

    /// Fund and open a fresh channel.
    /// Waits for the settlement layer to produce a coin before the engine
    /// hears anything.
    pub async fn open(&mut self) -> Result<()> {
        self.observers.publish(Delta::connection(
            ConnectionState::new(StateId::Starting).detail("doing handshake"),
        ));
        let target = self.engine.address()?;
        let spendable = self
            .relay
            .settlement()
            .create_spendable(&self.config.unique_id, &target, self.config.amount)
            .await
            .inspect_err(|e| log::error!("[session] funding failed: {}", e))
            .inspect_err(|e| self.observers.publish(Delta::error(e.to_string())))?;
        log::info!("[session] funded from coin {}", spendable.coin);
        self.engine.create_session(&SessionConfig {
            unique_id: self.config.unique_id.clone(),
            coin: spendable.coin,
            my_contribution: self.config.amount,
            their_contribution: self.config.amount,
            channel_timeout: self.config.channel_timeout,
            unroll_timeout: self.config.unroll_timeout,
            have_potato: self.config.i_started,
        })?;
        self.release()?;
        self.settle()?;
        self.drain()
    }

    /// Rebuild from a snapshot instead of opening a new channel.
    pub fn resume(&mut self, snapshot: Snapshot) -> Result<()> {
        if snapshot.unique_id != self.config.unique_id || snapshot.i_started != self.config.i_started {
            return Err(Error::Save(format!(
                "snapshot {} belongs to another session",
                snapshot.id
            )));
        }
        Phase::try_from(snapshot.move_number)?;
        self.engine.restore(&snapshot.engine)?;
        self.release()?;
        self.move_number = snapshot.move_number;
        self.my_turn = snapshot.my_turn;
        self.handshake_done = snapshot.handshake_done;
        self.card_selections = snapshot.card_selections;
        self.player_hand = snapshot.player_hand;
        self.opponent_hand = snapshot.opponent_hand;
        self.game_ids = snapshot.game_ids;
        self.result = snapshot.result;
        self.outcome = self.result.as_ref().map(|r| self.interpret(r));
        log::info!("[session] resumed {} at move {}", snapshot.id, self.move_number);
        self.observers.publish(Delta {
            game_connection_state: Some(ConnectionState::new(match self.handshake_done {
                true => StateId::Running,
                false => StateId::Starting,
            })),
            player_hand: Some(self.player_hand.clone()),
            opponent_hand: Some(self.opponent_hand.clone()),
            move_number: Some(self.move_number),
            my_turn: Some(self.my_turn),
            card_selections: Some(self.card_selections),
            outcome: Some(self.outcome.clone()),
            game_ids: Some(self.game_ids.clone()),
            ..Delta::default()
        });
        self.settle()?;
        self.drain()
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            id: self.engine.save_id()?,
            saved_at: crate::save::now(),
            engine: self.engine.serialize()?,
            unique_id: self.config.unique_id.clone(),
            i_started: self.config.i_started,
            amount: self.config.amount,
            move_number: self.move_number,
            my_turn: self.my_turn,
            card_selections: self.card_selections,
            handshake_done: self.handshake_done,
            player_hand: self.player_hand.clone(),
            opponent_hand: self.opponent_hand.clone(),
            game_ids: self.game_ids.clone(),
            result: self.result.clone(),
        })
    }

    /// Enqueue an event and process everything queued.
    ///
    /// A no-op once the session is finished. Before the session is opened,
    /// peer messages are held and other events wait in the queue. On error the
    /// failing event's delta is dropped and the error is published; events
    /// queued behind it stay queued for the next push.
    pub fn push(&mut self, event: Event) -> Result<()> {
        if self.finished {
            log::debug!("[session] finished, ignoring {}", event);
            return Ok(());
        }
        if !self.opened {
            log::debug!("[session] not open yet, holding {}", event);
            match event {
                Event::DeliverMessage(message) => self.held.push(message),
                event => self.queue.push_back(event),
            }
            return Ok(());
        }
        self.queue.push_back(event);
        self.drain().inspect_err(|e| {
            log::error!("[session] {}", e);
            if !matches!(e, Error::Protocol(_)) {
                self.observers.publish(Delta::error(e.to_string()));
            }
        })
    }

    pub fn subscribe(&self) -> tokio::sync::mpsc::UnboundedReceiver<Delta> {
        self.observers.subscribe()
    }
    pub fn observers(&self) -> &Observers {
        &self.observers
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
    pub fn move_number(&self) -> MoveNumber {
        self.move_number
    }
    pub fn phase(&self) -> Result<Phase> {
        Phase::try_from(self.move_number)
    }
    pub fn my_turn(&self) -> bool {
        self.my_turn
    }
    pub fn handshake_done(&self) -> bool {
        self.handshake_done
    }
    pub fn is_finished(&self) -> bool {
        self.finished
    }
    /// A local shutdown is waiting for the engine to finish.
    pub fn is_closing(&self) -> bool {
        self.closing && !self.finished
    }
    pub fn card_selections(&self) -> Selection {
        self.card_selections
    }
    pub fn player_hand(&self) -> &[Card] {
        &self.player_hand
    }
    pub fn opponent_hand(&self) -> &[Card] {
        &self.opponent_hand
    }
    pub fn game_ids(&self) -> &[GameId] {
        &self.game_ids
    }
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
    /// Give up the session, keeping its in-flight settlement submissions.
    pub fn into_relay(self) -> Relay {
        self.relay
    }
}

impl Session {
    fn drain(&mut self) -> Result<()> {
        while let Some(event) = self.queue.pop_front() {
            if self.finished && !event.is_terminal() {
                log::debug!("[session] finished, dropping {}", event);
                continue;
            }
            log::debug!("[session] handling {}", event);
            let delta = self.handle(event)?;
            self.observers.publish(delta);
            self.settle()?;
        }
        Ok(())
    }

    fn handle(&mut self, event: Event) -> Result<Delta> {
        if self.closing && event.is_play() {
            log::debug!("[session] closing, refusing {}", event);
            return Ok(Delta::default());
        }
        match event {
            Event::DeliverMessage(message) => self.deliver(message),
            Event::MakeMove => self.make_move(),
            Event::TakeOpponentMove(n, game, readable) => self.opponent_moved(n, game, readable),
            Event::TakeGameMessage(_, _, readable) => Ok(self.reveal(readable)),
            Event::SetCardSelections(mask) => Ok(self.select(mask)),
            Event::StartGame => self.start_game(),
            Event::ShutDown(reason) => self.shut_down(reason),
            Event::ReceivedShutdown => self.received_shutdown(),
            Event::TakeBlockData(peak, report) => self.block(peak, report),
        }
    }

    /// Poll the engine until it has nothing more to do.
    fn settle(&mut self) -> Result<()> {
        while !self.engine_finished {
            let idle = self.engine.idle()?;
            log::trace!("[session] idle {:?}", idle);
            if idle.finished {
                log::info!("[session] engine finished");
                self.engine_finished = true;
                self.finished = true;
                self.announce(Vec::new());
                self.queue.push_back(Event::ReceivedShutdown);
                return Ok(());
            }
            let mut delta = Delta::default();
            for notification in idle.notifications {
                self.notify(notification, &mut delta);
            }
            if idle.handshake_done && !self.handshake_done {
                log::info!("[session] handshake done");
                self.handshake_done = true;
                delta.game_connection_state = Some(ConnectionState::new(StateId::Running));
                self.queue.push_back(Event::StartGame);
            }
            if !idle.outbound_messages.is_empty() {
                log::debug!("[session] sending {} messages", idle.outbound_messages.len());
            }
            for message in idle.outbound_messages {
                let _ = self
                    .transport
                    .send(message)
                    .inspect_err(|e| log::warn!("[session] send failed: {}", e));
            }
            for transaction in idle.outbound_transactions {
                log::info!("[session] submitting {}", transaction);
                self.relay.submit(transaction);
            }
            let error = idle.receive_error;
            delta.error = error.clone();
            self.observers.publish(delta);
            if let Some(error) = error {
                return Err(Error::Protocol(error));
            }
            if !idle.continue_on {
                break;
            }
        }
        Ok(())
    }

    /// Turn an engine notification into queued work.
    fn notify(&mut self, notification: Notification, delta: &mut Delta) {
        if self.finished || self.closing {
            log::debug!("[session] closing, ignoring {:?}", notification);
            return;
        }
        match notification {
            Notification::OpponentMoved { game_id, readable } => self
                .queue
                .push_back(Event::TakeOpponentMove(self.move_number, game_id, readable)),
            Notification::GameMessage { game_id, readable } => self
                .queue
                .push_back(Event::TakeGameMessage(self.move_number, game_id, readable)),
            Notification::GameStarted { game_ids } => {
                game_ids
                    .into_iter()
                    .filter(|id| !self.game_ids.contains(id))
                    .collect::<Vec<_>>()
                    .into_iter()
                    .for_each(|id| self.game_ids.push(id));
                delta.game_ids = Some(self.game_ids.clone());
            }
            Notification::GameFinished { game_id, amount } => {
                log::info!("[session] game {} finished, {} paid", game_id, amount);
                self.game_ids.retain(|id| id != &game_id);
                self.reset();
                *delta = std::mem::take(delta).merge(Delta {
                    game_connection_state: Some(ConnectionState::new(StateId::Running)),
                    player_hand: Some(Vec::new()),
                    opponent_hand: Some(Vec::new()),
                    move_number: Some(0),
                    my_turn: Some(false),
                    card_selections: Some(Selection::empty()),
                    outcome: Some(None),
                    game_ids: Some(self.game_ids.clone()),
                    ..Delta::default()
                });
                self.queue.push_back(Event::StartGame);
            }
        }
    }

    fn reset(&mut self) {
        self.move_number = 0;
        self.my_turn = false;
        self.card_selections = Selection::empty();
        self.player_hand.clear();
        self.opponent_hand.clear();
        self.result = None;
        self.outcome = None;
    }

    /// Publish the terminal state, once.
    fn announce(&mut self, details: Vec<String>) {
        self.outcome = None;
        if self.announced {
            return;
        }
        self.announced = true;
        self.observers.publish(Delta {
            game_connection_state: Some(ConnectionState {
                state_identifier: StateId::Shutdown,
                state_detail: details,
            }),
            outcome: Some(None),
            ..Delta::default()
        });
    }

    /// Hand the engine whatever the peer sent before it existed.
    fn release(&mut self) -> Result<()> {
        self.opened = true;
        if !self.held.is_empty() {
            log::debug!("[session] delivering {} held messages", self.held.len());
        }
        for message in std::mem::take(&mut self.held) {
            self.engine.deliver_message(&message)?;
        }
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        if self.torn_down {
            return Ok(());
        }
        self.torn_down = true;
        log::info!("[session] tearing down engine");
        Ok(self.engine.shut_down()?)
    }
}

impl Session {
    fn deliver(&mut self, message: String) -> Result<Delta> {
        self.engine.deliver_message(&message)?;
        Ok(Delta::default())
    }

    fn block(&mut self, peak: crate::Peak, report: WatchReport) -> Result<Delta> {
        self.engine.block_data(peak, &report)?;
        Ok(Delta::default())
    }

    fn select(&mut self, mask: Selection) -> Delta {
        match self.move_number {
            1 => {
                self.card_selections = mask;
                Delta {
                    card_selections: Some(mask),
                    ..Delta::default()
                }
            }
            n => {
                log::debug!("[session] ignoring selection at move {}", n);
                Delta::default()
            }
        }
    }

    fn start_game(&mut self) -> Result<Delta> {
        if !self.handshake_done || !self.game_ids.is_empty() {
            log::debug!("[session] not starting a game yet");
            return Ok(Delta::default());
        }
        let my_turn = !self.config.i_started;
        let spec = GameSpec::new(
            &self.config.game_type,
            self.config.game_timeout,
            self.config.per_game(),
            my_turn,
        );
        let ids = self.engine.start_games(!self.config.i_started, &spec)?;
        log::info!("[session] started games {:?}", ids);
        self.game_ids.extend(ids);
        self.my_turn = my_turn;
        Ok(Delta {
            game_ids: Some(self.game_ids.clone()),
            my_turn: Some(my_turn),
            ..Delta::default()
        })
    }

    fn make_move(&mut self) -> Result<Delta> {
        let phase = Phase::try_from(self.move_number)?;
        let payload = match phase {
            Phase::AwaitingEntropyCommit => Payload::Start,
            Phase::AwaitingDiscardSelection => Payload::Discards(self.card_selections),
            Phase::AwaitingFinalReveal => Payload::Finish,
            Phase::HandComplete => return Err(Error::InvalidPhase(self.move_number)),
        };
        let Some(game) = self.game_ids.first().cloned().filter(|_| self.handshake_done) else {
            log::debug!("[session] no game to move in");
            return Ok(Delta::default());
        };
        if let Payload::Discards(mask) = payload
            && !mask.is_complete()
        {
            log::debug!("[session] {} cards marked, waiting for {}", mask.count(), crate::DISCARD_COUNT);
            return Ok(Delta::default());
        }
        let entropy = Entropy::random(&mut self.rng);
        self.engine.make_move(&game, &payload, &entropy)?;
        self.move_number += 1;
        self.my_turn = false;
        log::info!("[session] move {} sent ({})", self.move_number, payload);
        Ok(Delta {
            move_number: Some(self.move_number),
            my_turn: Some(false),
            game_connection_state: match payload {
                Payload::Finish => Some(ConnectionState::new(StateId::End)),
                _ => None,
            },
            ..Delta::default()
        })
    }

    fn opponent_moved(&mut self, n: MoveNumber, game: GameId, readable: Readable) -> Result<Delta> {
        log::info!("[session] opponent moved in {} at move {}", game, n);
        self.my_turn = true;
        let mut delta = match n {
            1 => self.reveal(readable),
            2 if !self.config.i_started => {
                let delta = self.conclude(readable);
                self.queue.push_back(Event::MakeMove);
                delta
            }
            n if n > 1 => {
                let mut delta = self.conclude(readable);
                if let Some(id) = self.game_ids.first().cloned() {
                    self.engine.accept(&id)?;
                    log::info!("[session] accepted {}", id);
                    self.game_ids.retain(|g| g != &id);
                    delta.game_ids = Some(self.game_ids.clone());
                }
                delta
            }
            _ => Delta::default(),
        };
        delta.my_turn = Some(true);
        delta.move_number = Some(self.move_number);
        Ok(delta)
    }

    /// Assign the dealt hands. Index 1 is ours if we opened the channel.
    fn reveal(&mut self, readable: Readable) -> Delta {
        match readable {
            Readable::Hands([alice, bob]) => {
                if alice.len() != crate::HAND_SIZE || bob.len() != crate::HAND_SIZE {
                    log::warn!("[session] dealt {} and {} cards", alice.len(), bob.len());
                }
                let (mine, theirs) = match self.config.i_started {
                    true => (bob, alice),
                    false => (alice, bob),
                };
                self.player_hand = mine;
                self.opponent_hand = theirs;
                Delta {
                    player_hand: Some(self.player_hand.clone()),
                    opponent_hand: Some(self.opponent_hand.clone()),
                    ..Delta::default()
                }
            }
            other => {
                log::debug!("[session] no hands in {:?}", other);
                Delta::default()
            }
        }
    }

    fn conclude(&mut self, readable: Readable) -> Delta {
        match readable {
            Readable::Result(result) => {
                let outcome = self.interpret(&result);
                log::info!("[session] hand over: {}", outcome);
                self.result = Some(result);
                self.outcome = Some(outcome.clone());
                Delta {
                    outcome: Some(Some(outcome)),
                    ..Delta::default()
                }
            }
            other => {
                log::warn!("[session] expected a result, got {:?}", other);
                Delta::default()
            }
        }
    }

    fn interpret(&self, result: &GameResult) -> Outcome {
        let (alice, bob) = match self.config.i_started {
            true => (&self.opponent_hand, &self.player_hand),
            false => (&self.player_hand, &self.opponent_hand),
        };
        Outcome::new(self.config.i_started, self.card_selections, alice, bob, result)
    }

    fn shut_down(&mut self, reason: Option<String>) -> Result<Delta> {
        log::info!("[session] shutting down: {:?}", reason);
        self.closing = true;
        self.teardown()?;
        self.announce(reason.into_iter().collect());
        Ok(Delta::default())
    }

    fn received_shutdown(&mut self) -> Result<Delta> {
        self.finished = true;
        self.teardown()?;
        self.announce(Vec::new());
        Ok(Delta::default())
    }
}

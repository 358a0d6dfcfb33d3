use super::*;
use crate::session::*;
use crate::settlement::Block;
use futures::Stream;
use futures::StreamExt;
use tokio::sync::mpsc::*;

/// Runs a [`Session`] on its own task.
///
/// The task is the session's sole owner. It multiplexes handle commands,
/// inbound peer messages and block notifications into session events and
/// stops when the session finishes or every [`Handle`] is gone. After a
/// finish, handles see the table closed while the task stays behind until
/// every transaction the engine emitted has been accepted; if the handles
/// went away first, those submissions are aborted.
pub struct Table;

impl Table {
    pub fn spawn<B>(session: Session, inbound: UnboundedReceiver<String>, blocks: B) -> Handle
    where
        B: Stream<Item = Block> + Send + Unpin + 'static,
    {
        let (tx, rx) = unbounded_channel();
        let handle = Handle::new(tx, session.observers().clone());
        tokio::spawn(Self::run(session, rx, inbound, blocks));
        handle
    }

    async fn run<B>(
        mut session: Session,
        mut commands: UnboundedReceiver<Command>,
        mut inbound: UnboundedReceiver<String>,
        mut blocks: B,
    ) where
        B: Stream<Item = Block> + Send + Unpin + 'static,
    {
        let merge = session.config().merge;
        let mut abandoned = false;
        let mut listening = true;
        let mut watching = true;
        log::info!("[table] running session {}", session.config().unique_id);
        loop {
            let event = tokio::select! {
                biased;
                command = commands.recv() => match command {
                    Some(Command::Push(event)) => event,
                    Some(Command::Snapshot(reply)) => {
                        let _ = reply.send(session.snapshot());
                        continue;
                    }
                    None => {
                        log::info!("[table] all handles dropped");
                        abandoned = true;
                        break;
                    }
                },
                message = inbound.recv(), if listening => match message {
                    Some(message) => Event::DeliverMessage(message),
                    None => {
                        log::warn!("[table] peer transport closed");
                        listening = false;
                        continue;
                    }
                },
                block = blocks.next(), if watching => match block {
                    Some(block) => {
                        let (peak, report) = block.fold(merge);
                        Event::TakeBlockData(peak, report)
                    }
                    None => {
                        log::warn!("[table] block stream ended");
                        watching = false;
                        continue;
                    }
                },
            };
            let _ = session
                .push(event)
                .inspect_err(|e| log::warn!("[table] event failed: {}", e));
            if session.is_finished() && session.queued() == 0 {
                log::info!("[table] session finished");
                break;
            }
        }
        drop(commands);
        let relay = session.into_relay();
        if !abandoned && relay.pending() > 0 {
            log::info!("[table] waiting on {} submissions", relay.pending());
            relay.flush().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use crate::cards::Selection;
    use crate::engine::*;
    use crate::error::Error;
    use crate::mocks::*;
    use crate::settlement::*;
    use std::sync::Arc;
    use std::time::Duration;

    struct Rig {
        handle: Handle,
        engine: Scripted,
        ledger: Ledger,
        peer: UnboundedSender<String>,
        chain: futures::channel::mpsc::UnboundedSender<Block>,
    }

    async fn rig(config: Config) -> Rig {
        let engine = Scripted::default();
        engine.then(Idle {
            handshake_done: true,
            ..Idle::default()
        });
        let ledger = Ledger::default();
        let mut session = Session::new(
            config,
            Box::new(engine.clone()),
            Arc::new(Recorder::default()),
            Arc::new(ledger.clone()),
        );
        session.open().await.unwrap();
        let (peer, inbound) = unbounded_channel();
        let (chain, blocks) = futures::channel::mpsc::unbounded();
        let handle = Table::spawn(session, inbound, blocks);
        Rig {
            handle,
            engine,
            ledger,
            peer,
            chain,
        }
    }

    async fn until(f: impl Fn() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !f() {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("condition within timeout")
    }

    #[tokio::test]
    async fn handle_drives_session() {
        let rig = rig(Config::new("me", false, 100)).await;
        let mut deltas = rig.handle.subscribe();
        rig.handle.make_move().unwrap();
        loop {
            let delta = deltas.recv().await.unwrap();
            if delta.move_number == Some(1) {
                break;
            }
        }
        assert_eq!(rig.engine.moves(), vec![Payload::Start]);
        let snapshot = rig.handle.snapshot().await.unwrap();
        assert_eq!(snapshot.move_number, 1);
    }

    #[tokio::test]
    async fn peer_messages_become_events() {
        let rig = rig(Config::new("me", true, 100)).await;
        rig.peer.send("hello".into()).unwrap();
        until(|| {
            rig.engine
                .driving()
                .contains(&Call::DeliverMessage("hello".into()))
        })
        .await;
    }

    #[tokio::test]
    async fn blocks_are_folded() {
        let config = Config {
            merge: Merge::Deduplicate,
            ..Config::new("me", true, 100)
        };
        let rig = rig(config).await;
        let report = WatchReport {
            created_watched: vec![Coin::from("a")],
            ..WatchReport::default()
        };
        rig.chain
            .unbounded_send(Block {
                peak: 42,
                reports: vec![report.clone(), report.clone()],
            })
            .unwrap();
        until(|| {
            rig.engine
                .driving()
                .contains(&Call::BlockData(42, report.clone()))
        })
        .await;
    }

    #[tokio::test]
    async fn stops_after_shutdown() {
        let rig = rig(Config::new("me", true, 100)).await;
        let mut deltas = rig.handle.subscribe();
        rig.handle.shut_down(Some("bye".into())).unwrap();
        let terminal = deltas.recv().await.unwrap();
        assert_eq!(terminal.game_connection_state.unwrap().state_detail, vec!["bye"]);
        until(|| {
            rig.engine
                .calls()
                .iter()
                .skip_while(|c| *c != &Call::ShutDown)
                .any(|c| c == &Call::Idle)
        })
        .await;
        assert!(!rig.handle.is_closed());
        rig.engine.then(Idle {
            finished: true,
            ..Idle::default()
        });
        rig.peer.send("shutdown-ack".into()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), rig.handle.closed())
            .await
            .unwrap();
        assert!(rig.handle.is_closed());
        assert!(matches!(rig.handle.make_move(), Err(Error::Closed)));
        assert!(matches!(rig.handle.snapshot().await, Err(Error::Closed)));
        assert!(rig.engine.driving().contains(&Call::DeliverMessage("shutdown-ack".into())));
        assert_eq!(rig.engine.count(|c| c == &Call::ShutDown), 1);
    }

    #[tokio::test]
    async fn closing_spend_outlives_table() {
        let rig = rig(Config {
            retry_delay: 0,
            ..Config::new("me", true, 100)
        })
        .await;
        rig.ledger
            .respond(Err(SettlementError::classify("UNKNOWN_UNSPENT")));
        rig.engine
            .then(Idle {
                continue_on: true,
                outbound_transactions: vec![Transaction::from("closing-spend")],
                ..Idle::default()
            })
            .then(Idle {
                finished: true,
                ..Idle::default()
            });
        rig.handle.shut_down(None).unwrap();
        tokio::time::timeout(Duration::from_secs(5), rig.handle.closed())
            .await
            .unwrap();
        until(|| rig.ledger.submitted().len() == 2).await;
        assert!(
            rig.ledger
                .submitted()
                .iter()
                .all(|t| t == &Transaction::from("closing-spend"))
        );
    }

    #[tokio::test]
    async fn stops_when_handles_drop() {
        let rig = rig(Config::new("me", true, 100)).await;
        let observer = rig.handle.clone();
        let mut deltas = observer.subscribe();
        drop(observer);
        drop(rig.handle);
        assert!(
            tokio::time::timeout(Duration::from_secs(5), deltas.recv())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn peers_hear_each_other() {
        let (alice, bob) = crate::transport::Channel::<String>::pair();
        let (alice_tx, alice_rx) = alice.split();
        let (bob_tx, bob_rx) = bob.split();
        let opener = Scripted::default();
        opener.then(Idle {
            handshake_done: true,
            outbound_messages: vec!["hello".into()],
            ..Idle::default()
        });
        let joiner = Scripted::default();
        joiner.then(Idle {
            handshake_done: true,
            outbound_messages: vec!["welcome".into()],
            ..Idle::default()
        });
        let (_a_chain, a_blocks) = futures::channel::mpsc::unbounded::<Block>();
        let (_b_chain, b_blocks) = futures::channel::mpsc::unbounded::<Block>();
        let mut a = Session::new(
            Config::new("a", true, 100),
            Box::new(opener.clone()),
            Arc::new(alice_tx),
            Arc::new(Ledger::default()),
        );
        let mut b = Session::new(
            Config::new("b", false, 100),
            Box::new(joiner.clone()),
            Arc::new(bob_tx),
            Arc::new(Ledger::default()),
        );
        a.open().await.unwrap();
        b.open().await.unwrap();
        let _a = Table::spawn(a, alice_rx, a_blocks);
        let _b = Table::spawn(b, bob_rx, b_blocks);
        until(|| opener.driving().contains(&Call::DeliverMessage("welcome".into()))).await;
        until(|| joiner.driving().contains(&Call::DeliverMessage("hello".into()))).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_handles_are_serialized() {
        let rig = rig(Config::new("me", false, 100)).await;
        for i in 0..200 {
            rig.engine.then(Idle {
                continue_on: i % 2 == 0,
                outbound_messages: vec![format!("out{}", i)],
                ..Idle::default()
            });
        }
        let writers = (0..8)
            .map(|w| {
                let handle = rig.handle.clone();
                tokio::spawn(async move {
                    for i in 0..25 {
                        handle.deliver_message(format!("w{}-{}", w, i)).unwrap();
                        handle
                            .set_card_selections(Selection::from(0b0000_1111))
                            .unwrap();
                        handle.make_move().unwrap();
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect::<Vec<_>>();
        for writer in writers {
            writer.await.unwrap();
        }
        until(|| rig.engine.count(|c| matches!(c, Call::DeliverMessage(_))) == 200).await;
        assert_eq!(rig.engine.deepest(), 1);
        let snapshot = rig.handle.snapshot().await.unwrap();
        assert_eq!(snapshot.move_number, crate::FINAL_MOVE);
    }
}

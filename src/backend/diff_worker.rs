use crate::diff::DiffOptions;
use crate::engine::{self, DiffEngine, DiffError, DiffResult, Readiness, ReadinessGate};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tracing::{debug, error, info};

pub struct DiffRequest {
    pub generation: u64,
    pub original: String,
    pub candidate: String,
}

pub struct DiffReply {
    pub generation: u64,
    pub outcome: Result<DiffResult, DiffError>,
}

struct Worker {
    engine: DiffEngine,
    receiver: Receiver<DiffRequest>,
    reply_sender: Sender<DiffReply>,
}

impl Worker {
    fn run(self) {
        self.engine.gate().set(Readiness::Ready);
        info!("Diff worker started");

        while let Ok(mut request) = self.receiver.recv() {
            // Only the newest queued pair is worth computing
            while let Ok(newer) = self.receiver.try_recv() {
                debug!("Skipping superseded diff request #{}", request.generation);
                request = newer;
            }

            let outcome = self
                .engine
                .compute(&request.original, &request.candidate);
            let reply = DiffReply {
                generation: request.generation,
                outcome,
            };
            if self.reply_sender.send(reply).is_err() {
                break;
            }
        }

        info!("Diff worker stopped");
    }
}

/// Host side of the comparison service.
///
/// Pairs are computed on a dedicated thread. Each request gets a new
/// generation and only the reply for the latest generation is applied, so a
/// slow comparison never overwrites a newer one.
pub struct DiffWorker {
    sender: Option<Sender<DiffRequest>>,
    receiver: Receiver<DiffReply>,
    gate: ReadinessGate,
    generation: u64,
    applied_generation: u64,
    last_pair: Option<(String, String)>,
    current: DiffResult,
    last_error: Option<DiffError>,
}

impl DiffWorker {
    pub fn spawn(options: DiffOptions) -> Self {
        let gate = ReadinessGate::new();
        let (sender, request_receiver) = mpsc::channel();
        let (reply_sender, receiver) = mpsc::channel();

        let worker = Worker {
            engine: DiffEngine::new(gate.clone(), options),
            receiver: request_receiver,
            reply_sender,
        };

        let sender = match thread::Builder::new()
            .name("diff-worker".to_string())
            .spawn(move || worker.run())
        {
            Ok(_) => Some(sender),
            Err(e) => {
                error!("Failed to start diff worker: {}", e);
                gate.set(Readiness::Unavailable);
                None
            }
        };

        Self {
            sender,
            receiver,
            gate,
            generation: 0,
            applied_generation: 0,
            last_pair: None,
            current: DiffResult::empty(),
            last_error: None,
        }
    }

    pub fn readiness(&self) -> Readiness {
        self.gate.get()
    }

    /// Queue a comparison unless the pair equals the last one requested
    pub fn request(&mut self, original: &str, candidate: &str) {
        if self
            .last_pair
            .as_ref()
            .is_some_and(|(o, c)| o == original && c == candidate)
        {
            return;
        }

        self.last_pair = Some((original.to_string(), candidate.to_string()));
        self.generation += 1;

        let request = DiffRequest {
            generation: self.generation,
            original: original.to_string(),
            candidate: candidate.to_string(),
        };

        let sent = self
            .sender
            .as_ref()
            .is_some_and(|sender| sender.send(request).is_ok());
        if !sent {
            if self.sender.take().is_some() {
                error!("Diff worker is gone");
            }
            self.gate.set(Readiness::Unavailable);
            let generation = self.generation;
            self.apply(generation, Err(DiffError::EngineUnavailable));
        }
    }

    /// Drain finished comparisons. Returns `true` if the latest one was applied.
    pub fn poll(&mut self) -> bool {
        let mut applied = false;
        while let Ok(reply) = self.receiver.try_recv() {
            if reply.generation != self.generation {
                debug!(
                    "Discarding stale diff result #{} (latest #{})",
                    reply.generation, self.generation
                );
                continue;
            }
            self.apply(reply.generation, reply.outcome);
            applied = true;
        }
        applied
    }

    fn apply(&mut self, generation: u64, outcome: Result<DiffResult, DiffError>) {
        self.applied_generation = generation;
        self.last_error = outcome.as_ref().err().cloned();
        self.current = engine::resolve(outcome);
    }

    /// Forget the current pair, e.g. when the review is reset
    pub fn clear(&mut self) {
        if self.last_pair.is_none() {
            return;
        }
        self.last_pair = None;
        self.generation += 1;
        self.applied_generation = self.generation;
        self.current = DiffResult::empty();
        self.last_error = None;
    }

    /// Whether the result reflects the latest requested pair
    pub fn is_settled(&self) -> bool {
        self.applied_generation == self.generation
    }

    pub fn result(&self) -> &DiffResult {
        &self.current
    }

    pub fn last_error(&self) -> Option<&DiffError> {
        self.last_error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_until_settled(worker: &mut DiffWorker) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !worker.is_settled() {
            worker.poll();
            assert!(Instant::now() < deadline, "diff worker did not answer");
            thread::sleep(Duration::from_millis(5));
        }
    }

    /// A worker whose thread is replaced by the test itself
    fn detached_worker() -> (DiffWorker, Receiver<DiffRequest>, Sender<DiffReply>) {
        let gate = ReadinessGate::new();
        gate.set(Readiness::Ready);
        let (sender, request_receiver) = mpsc::channel();
        let (reply_sender, receiver) = mpsc::channel();
        let worker = DiffWorker {
            sender: Some(sender),
            receiver,
            gate,
            generation: 0,
            applied_generation: 0,
            last_pair: None,
            current: DiffResult::empty(),
            last_error: None,
        };
        (worker, request_receiver, reply_sender)
    }

    fn reply_for(request: &DiffRequest) -> DiffReply {
        let gate = ReadinessGate::new();
        gate.set(Readiness::Ready);
        let engine = DiffEngine::new(gate, DiffOptions::default());
        DiffReply {
            generation: request.generation,
            outcome: engine.compute(&request.original, &request.candidate),
        }
    }

    #[test]
    fn spawned_worker_becomes_ready_and_computes() {
        let mut worker = DiffWorker::spawn(DiffOptions::default());
        worker.request("casa", "caza");
        wait_until_settled(&mut worker);

        assert_eq!(worker.readiness(), Readiness::Ready);
        assert_eq!(worker.result().added_count(), 1);
        assert_eq!(worker.result().removed_count(), 1);
        assert!(worker.last_error().is_none());
    }

    #[test]
    fn latest_of_many_requests_wins() {
        let mut worker = DiffWorker::spawn(DiffOptions::default());
        for i in 0..20 {
            worker.request("texto", &format!("texto {}", i));
        }
        worker.request("texto", "texto final");
        wait_until_settled(&mut worker);

        let result = worker.result();
        assert_eq!(crate::diff::candidate_text(result.segments()), "texto final");
    }

    #[test]
    fn stale_reply_is_discarded() {
        let (mut worker, requests, replies) = detached_worker();

        worker.request("a", "ab");
        let first = requests.recv().unwrap();
        worker.request("a", "abc");
        let second = requests.recv().unwrap();

        // The newer reply arrives first, the older one afterwards
        replies.send(reply_for(&second)).unwrap();
        replies.send(reply_for(&first)).unwrap();

        assert!(worker.poll());
        assert!(worker.is_settled());
        assert_eq!(worker.result().added_count(), 2);
    }

    #[test]
    fn unchanged_pair_is_not_requested_again() {
        let (mut worker, requests, _replies) = detached_worker();

        worker.request("igual", "igual.");
        worker.request("igual", "igual.");
        assert!(requests.try_recv().is_ok());
        assert!(requests.try_recv().is_err());
    }

    #[test]
    fn pending_until_reply_arrives() {
        let (mut worker, requests, replies) = detached_worker();
        worker.request("a", "b");
        assert!(!worker.is_settled());

        let request = requests.recv().unwrap();
        replies.send(reply_for(&request)).unwrap();
        worker.poll();
        assert!(worker.is_settled());
    }

    #[test]
    fn lost_worker_reports_unavailable() {
        let (mut worker, requests, _replies) = detached_worker();
        drop(requests);

        worker.request("texto", "texto revisado");
        assert_eq!(worker.readiness(), Readiness::Unavailable);
        assert_eq!(worker.last_error(), Some(&DiffError::EngineUnavailable));
        assert!(worker.result().is_empty());
        assert!(worker.result().display_units().is_empty());
        assert_eq!(worker.result().added_count(), 0);
        assert!(worker.is_settled());
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut worker = DiffWorker::spawn(DiffOptions::default());
        worker.request("a", "b");
        wait_until_settled(&mut worker);
        assert!(!worker.result().is_empty());

        worker.clear();
        assert!(worker.result().is_empty());
        assert!(worker.is_settled());

        // A late reply for the cleared pair must not resurface
        thread::sleep(Duration::from_millis(20));
        worker.poll();
        assert!(worker.result().is_empty());
    }
}

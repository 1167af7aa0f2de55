/// Only a random 1% of written packets come back, and the channel turns down
/// about 10% of the data that does
use std::collections::HashSet;

use tandem_shared::{ConnectionCounter, ReadOutcome};
use tandem_test::{init_logging, TestProtocol};

const ITERATIONS: usize = 10_240;

fn run(seed: u64) {
    init_logging();

    let protocol = TestProtocol::new(seed, 10);
    let mut connection = protocol.connection();
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut accepted = HashSet::new();

    for _ in 0..ITERATIONS {
        let packet = connection.write_packet().unwrap();
        if rng.u32(0..100) != 0 {
            continue;
        }
        if connection.read_packet(&packet) == Ok(ReadOutcome::Accepted) {
            accepted.insert(packet.sequence());
        }
    }

    let acked = connection.counter(ConnectionCounter::PacketsAcked);
    assert!(acked > 0, "nothing was acked with seed {}", seed);
    assert!(acked <= accepted.len() as u64);
    assert_eq!(
        connection.counter(ConnectionCounter::PacketsRead),
        accepted.len() as u64
    );
    assert_eq!(
        connection.counter(ConnectionCounter::PacketsWritten),
        ITERATIONS as u64
    );

    let log = protocol.ack_log.lock();
    assert_eq!(log.acked_count() as u64, acked);
    assert!(log.acked_exactly_once());
    for sequence in log.acks.keys() {
        assert!(
            accepted.contains(sequence),
            "sequence {} acked without being accepted",
            sequence
        );
    }

    // rejection stays inside the channel
    assert_eq!(log.accepted.len() + log.rejected.len(), accepted.len());
}

#[test]
fn lossy_feedback() {
    run(0x5eed);
}

#[test]
fn lossy_feedback_other_seeds() {
    for seed in 1..8 {
        run(seed);
    }
}

/// PROPERTY-BASED TESTS: acknowledgment invariants under loss and reordering
///
/// Two Connections exchange packets over queues that drop and reorder them.
/// Whatever the schedule:
/// 1. Every sequence one side reports as acked was accepted by the other side
/// 2. No sequence is reported acked twice
/// 3. The ack counter matches what the channels were told
use std::collections::{HashSet, VecDeque};

use proptest::prelude::*;
use tandem_shared::{Connection, ConnectionCounter, ConnectionPacket, ReadOutcome};
use tandem_test::TestProtocol;

const QUEUE_LIMIT: usize = 8;

#[derive(Debug, Clone)]
struct Step {
    deliver: bool,
    pick_forward: usize,
    pick_backward: usize,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    (any::<bool>(), 0usize..QUEUE_LIMIT, 0usize..QUEUE_LIMIT).prop_map(
        |(deliver, pick_forward, pick_backward)| Step {
            deliver,
            pick_forward,
            pick_backward,
        },
    )
}

fn push(queue: &mut VecDeque<ConnectionPacket>, packet: ConnectionPacket) {
    // the oldest packet in flight is lost when the queue overflows
    if queue.len() == QUEUE_LIMIT {
        queue.pop_front();
    }
    queue.push_back(packet);
}

fn deliver(
    queue: &mut VecDeque<ConnectionPacket>,
    pick: usize,
    to: &mut Connection,
    accepted: &mut HashSet<u16>,
) {
    if queue.is_empty() {
        return;
    }
    let index = pick % queue.len();
    if let Some(packet) = queue.remove(index) {
        if to.read_packet(&packet) == Ok(ReadOutcome::Accepted) {
            accepted.insert(packet.sequence());
        }
    }
}

proptest! {
    #[test]
    fn prop_acked_implies_accepted(steps in prop::collection::vec(step_strategy(), 1..300)) {
        let a_protocol = TestProtocol::new(11, 10);
        let b_protocol = TestProtocol::new(12, 10);
        let mut a = a_protocol.connection();
        let mut b = b_protocol.connection();

        let mut forward = VecDeque::new();
        let mut backward = VecDeque::new();
        let mut accepted_by_a = HashSet::new();
        let mut accepted_by_b = HashSet::new();

        for step in &steps {
            push(&mut forward, a.write_packet().unwrap());
            push(&mut backward, b.write_packet().unwrap());

            if step.deliver {
                deliver(&mut forward, step.pick_forward, &mut b, &mut accepted_by_b);
                deliver(&mut backward, step.pick_backward, &mut a, &mut accepted_by_a);
            }
        }

        for (connection, protocol, accepted_by_peer) in [
            (&a, &a_protocol, &accepted_by_b),
            (&b, &b_protocol, &accepted_by_a),
        ] {
            let log = protocol.ack_log.lock();
            prop_assert!(log.acked_exactly_once());
            prop_assert_eq!(
                log.acked_count() as u64,
                connection.counter(ConnectionCounter::PacketsAcked)
            );
            for sequence in log.acks.keys() {
                prop_assert!(accepted_by_peer.contains(sequence));
            }
        }

        prop_assert_eq!(
            a.counter(ConnectionCounter::PacketsRead),
            accepted_by_a.len() as u64
        );
        prop_assert_eq!(
            b.counter(ConnectionCounter::PacketsRead),
            accepted_by_b.len() as u64
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_sequences_are_consecutive(start in 0u32..70_000, count in 1usize..200) {
        let protocol = TestProtocol::new(1, 0);
        let mut connection = protocol.connection();

        // burn through sequences quickly to start anywhere on the ring
        for _ in 0..start {
            connection.write_packet().unwrap();
        }

        let first = connection.next_sequence();
        for offset in 0..count {
            let packet = connection.write_packet().unwrap();
            prop_assert_eq!(packet.sequence(), first.wrapping_add(offset as u16));
        }
    }
}

/// Acks as seen between two separate Connections
use tandem_shared::{
    is_acked, ConnectionCounter, ReadOutcome, ACK_BITFIELD_BITS, SENT_PACKETS_WINDOW,
};
use tandem_test::{FakeChannel, TestProtocol, FAKE_CHANNEL, TEST_PACKET};

#[test]
fn accepted_sequence_stays_acked_for_the_window() {
    let sender_protocol = TestProtocol::new(1, 0);
    let receiver_protocol = TestProtocol::new(2, 0);
    let mut sender = sender_protocol.connection();
    let mut receiver = receiver_protocol.connection();

    let first = sender.write_packet().unwrap();
    let acked_sequence = first.sequence();
    receiver.read_packet(&first).unwrap();

    // the receiver keeps accepting newer packets, and keeps asserting the
    // first one until it falls off the end of the bitfield
    for i in 0..=ACK_BITFIELD_BITS {
        let reply = receiver.write_packet().unwrap();
        let ack = reply.ack().unwrap();
        assert!(
            is_acked(acked_sequence, ack, reply.ack_bits()),
            "write {} lost the ack",
            i
        );
        let packet = sender.write_packet().unwrap();
        receiver.read_packet(&packet).unwrap();
    }

    let reply = receiver.write_packet().unwrap();
    assert!(!is_acked(acked_sequence, reply.ack().unwrap(), reply.ack_bits()));
}

#[test]
fn reasserted_acks_are_reported_once() {
    let a_protocol = TestProtocol::new(1, 0);
    let b_protocol = TestProtocol::new(2, 0);
    let mut a = a_protocol.connection();
    let mut b = b_protocol.connection();

    for _ in 0..10 {
        let packet = a.write_packet().unwrap();
        b.read_packet(&packet).unwrap();
    }

    // each reply re-asserts everything b has accepted so far
    let replies: Vec<_> = (0..5).map(|_| b.write_packet().unwrap()).collect();
    for reply in &replies {
        assert_eq!(a.read_packet(reply), Ok(ReadOutcome::Accepted));
    }

    assert_eq!(a.counter(ConnectionCounter::PacketsAcked), 10);
    let log = a_protocol.ack_log.lock();
    assert_eq!(log.acked_count(), 10);
    assert!(log.acked_exactly_once());

    let fake = a.channel_as::<FakeChannel>(FAKE_CHANNEL).unwrap();
    assert_eq!(fake.ack_count, 10);
}

#[test]
fn replaying_a_packet_acks_nothing_new() {
    let a_protocol = TestProtocol::new(1, 0);
    let b_protocol = TestProtocol::new(2, 0);
    let mut a = a_protocol.connection();
    let mut b = b_protocol.connection();

    for _ in 0..3 {
        let packet = a.write_packet().unwrap();
        b.read_packet(&packet).unwrap();
    }
    let reply = b.write_packet().unwrap();

    a.read_packet(&reply).unwrap();
    let counters = a.counters();
    assert_eq!(counters.packets_acked(), 3);

    assert_eq!(a.read_packet(&reply), Ok(ReadOutcome::Discarded));
    assert_eq!(a.counters().packets_acked(), 3);
    assert_eq!(a.counters().packets_discarded(), counters.packets_discarded() + 1);
    assert!(a_protocol.ack_log.lock().acked_exactly_once());
}

#[test]
fn acks_for_unsent_sequences_are_ignored() {
    let a_protocol = TestProtocol::new(1, 0);
    let b_protocol = TestProtocol::new(2, 0);
    let mut a = a_protocol.connection();
    let mut b = b_protocol.connection();

    // b has seen far more packets from someone than a ever sent
    let mut forged = b_protocol.factory.create(TEST_PACKET).unwrap();
    forged.set_sequence(0);
    forged.set_acks(Some(500), u32::MAX);
    assert_eq!(a.read_packet(&forged), Ok(ReadOutcome::Accepted));
    assert_eq!(a.counter(ConnectionCounter::PacketsAcked), 0);

    let packet = a.write_packet().unwrap();
    b.read_packet(&packet).unwrap();
    assert_eq!(b.counter(ConnectionCounter::PacketsAcked), 0);
}

#[test]
fn acks_older_than_send_history_are_ignored() {
    let a_protocol = TestProtocol::new(1, 0);
    let b_protocol = TestProtocol::new(2, 0);
    let mut a = a_protocol.connection();

    let written = SENT_PACKETS_WINDOW as u16 + 44;
    for _ in 0..written {
        a.write_packet().unwrap();
    }

    // 40 and the 32 before it have all left the send history
    let mut late = b_protocol.factory.create(TEST_PACKET).unwrap();
    late.set_sequence(0);
    late.set_acks(Some(40), u32::MAX);
    assert_eq!(a.read_packet(&late), Ok(ReadOutcome::Accepted));

    assert_eq!(a.counter(ConnectionCounter::PacketsAcked), 0);
    assert_eq!(a.channel_as::<FakeChannel>(FAKE_CHANNEL).unwrap().ack_count, 0);
    {
        let log = a_protocol.ack_log.lock();
        assert_eq!(log.acked_count(), 0);
        assert!(!log.was_acked(40));
    }

    // the newest sequence is still tracked
    let mut recent = b_protocol.factory.create(TEST_PACKET).unwrap();
    recent.set_sequence(1);
    recent.set_acks(Some(written - 1), 0);
    assert_eq!(a.read_packet(&recent), Ok(ReadOutcome::Accepted));

    assert_eq!(a.counter(ConnectionCounter::PacketsAcked), 1);
    assert!(a_protocol.ack_log.lock().was_acked(written - 1));
}

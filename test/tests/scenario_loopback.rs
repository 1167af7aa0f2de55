/// A Connection that reads back every packet it writes
use tandem_shared::{ConnectionCounter, ReadOutcome};
use tandem_test::{init_logging, FakeChannel, TestProtocol, ACK_CHANNEL, FAKE_CHANNEL};

#[test]
fn loopback_reaches_target_acks() {
    init_logging();

    const TARGET_ACKS: u64 = 1000;

    let protocol = TestProtocol::new(1, 0);
    let mut connection = protocol.connection();

    while connection.counter(ConnectionCounter::PacketsAcked) < TARGET_ACKS {
        let packet = connection.write_packet().unwrap();
        assert_eq!(connection.read_packet(&packet), Ok(ReadOutcome::Accepted));
    }

    let counters = connection.counters();
    assert_eq!(counters.packets_acked(), TARGET_ACKS);
    assert_eq!(counters.packets_written(), TARGET_ACKS + 1);
    assert_eq!(counters.packets_read(), TARGET_ACKS + 1);
    assert_eq!(counters.packets_discarded(), 0);

    // every channel hears every ack, whether or not it sent data
    let fake = connection.channel_as::<FakeChannel>(FAKE_CHANNEL).unwrap();
    assert_eq!(fake.ack_count as u64, TARGET_ACKS);
    assert_eq!(fake.data_count, 0);

    let log = protocol.ack_log.lock();
    assert_eq!(log.acked_count() as u64, TARGET_ACKS);
    assert!(log.acked_exactly_once());
    assert_eq!(
        (log.accepted.len() + log.rejected.len()) as u64,
        TARGET_ACKS + 1
    );
    assert!(connection.channel(ACK_CHANNEL).is_some());
}

#[test]
fn loopback_across_the_wrap() {
    let protocol = TestProtocol::new(2, 0);
    let mut connection = protocol.connection();

    for i in 0..70_000u32 {
        let packet = connection.write_packet().unwrap();
        assert_eq!(packet.sequence(), i as u16);
        connection.read_packet(&packet).unwrap();
    }

    let counters = connection.counters();
    assert_eq!(counters.packets_read(), 70_000);
    assert_eq!(counters.packets_acked(), 69_999);
    assert_eq!(counters.packets_discarded(), 0);
    assert!(protocol.ack_log.lock().acked_exactly_once());
}

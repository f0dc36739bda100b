use buffspawn::exec::ChannelBuffer;
use buffspawn::Channel;
use buffspawn_test_utils::progress::ProgressRecorder;
use proptest::prelude::*;

/// Split `bytes` at the given (unsorted, possibly repeated) cut points.
fn split_at_points(bytes: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
    let mut points: Vec<usize> = cuts.iter().map(|c| c % (bytes.len() + 1)).collect();
    points.sort_unstable();
    points.dedup();

    let mut chunks = Vec::new();
    let mut start = 0;
    for p in points {
        chunks.push(bytes[start..p].to_vec());
        start = p;
    }
    chunks.push(bytes[start..].to_vec());
    chunks
}

proptest! {
    #[test]
    fn arbitrary_chunking_reassembles_text(
        text in "\\PC{0,64}",
        cuts in proptest::collection::vec(any::<usize>(), 0..16),
    ) {
        let mut buf = ChannelBuffer::new(Channel::Stdout, None);
        for chunk in split_at_points(text.as_bytes(), &cuts) {
            buf.push(&chunk);
        }
        prop_assert_eq!(buf.into_text(), text);
    }

    #[test]
    fn progress_matches_buffered_bytes(
        text in "\\PC{0,64}",
        cuts in proptest::collection::vec(any::<usize>(), 0..16),
    ) {
        let (mut recorder, sink) = ProgressRecorder::new();
        let mut buf = ChannelBuffer::new(Channel::Stderr, Some(sink));
        for chunk in split_at_points(text.as_bytes(), &cuts) {
            buf.push(&chunk);
        }

        let events = recorder.events();
        prop_assert_eq!(ProgressRecorder::joined(&events, Channel::Stderr), buf.as_bytes().to_vec());
        prop_assert!(ProgressRecorder::joined(&events, Channel::Stdout).is_empty());
    }
}

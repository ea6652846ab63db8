use super::*;

fn message_bytes(subject: &str, body: &str) -> Vec<u8> {
    format!(
        "From: alice@example.com\r\nSubject: {subject}\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{body}"
    )
    .into_bytes()
}

fn candidate(uid: u32, body: &str, arrived_at: chrono::DateTime<chrono::Utc>) -> Candidate {
    Candidate {
        uid,
        body: message_bytes("test message", body),
        arrived_at: Some(arrived_at.fixed_offset()),
    }
}

async fn run_batch(
    candidates: Vec<Candidate>,
    watermark: &mut Watermark,
    now: chrono::DateTime<chrono::Utc>,
) -> Vec<String> {
    let sent = std::sync::Mutex::new(Vec::new());
    let mut notify = |text: String| {
        sent.lock().expect("notify mutex poisoned").push(text);
        async {}
    };
    process_batch(candidates, watermark, now, "inbox@example.com", &mut notify).await;
    sent.into_inner().expect("notify mutex poisoned")
}

#[test]
fn watermark_advance_is_monotonic() {
    let mut watermark = Watermark::new(5);
    watermark.advance(9);
    assert_eq!(watermark.value(), 9);
    watermark.advance(3);
    assert_eq!(watermark.value(), 9);
}

#[test]
fn watermark_covers_equal_and_lower_uids() {
    let watermark = Watermark::new(4);
    assert!(watermark.is_processed(3));
    assert!(watermark.is_processed(4));
    assert!(!watermark.is_processed(5));
}

#[tokio::test]
async fn fresh_candidates_are_notified_in_uid_order() {
    let now = chrono::Utc::now();
    let mut watermark = Watermark::new(0);
    let candidates = vec![
        candidate(3, "third", now),
        candidate(1, "first", now),
        candidate(2, "second", now),
    ];
    let sent = run_batch(candidates, &mut watermark, now).await;
    assert_eq!(sent.len(), 3);
    assert!(sent[0].contains("first"));
    assert!(sent[1].contains("second"));
    assert!(sent[2].contains("third"));
    assert_eq!(watermark.value(), 3);
}

#[tokio::test]
async fn candidates_at_or_below_the_watermark_are_skipped() {
    let now = chrono::Utc::now();
    let mut watermark = Watermark::new(2);
    let candidates = vec![
        candidate(1, "stale one", now),
        candidate(2, "stale two", now),
        candidate(3, "genuinely new", now),
    ];
    let sent = run_batch(candidates, &mut watermark, now).await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("genuinely new"));
    assert_eq!(watermark.value(), 3);
}

#[tokio::test]
async fn a_second_pass_never_renotifies() {
    let now = chrono::Utc::now();
    let mut watermark = Watermark::new(0);
    let candidates = vec![candidate(1, "hello", now), candidate(2, "world", now)];

    let sent = run_batch(candidates.clone(), &mut watermark, now).await;
    assert_eq!(sent.len(), 2);

    let resent = run_batch(candidates, &mut watermark, now).await;
    assert!(resent.is_empty());
    assert_eq!(watermark.value(), 2);
}

#[tokio::test]
async fn stale_candidates_are_skipped_without_advancing_the_watermark() {
    let now = chrono::Utc::now();
    let stale = now - chrono::Duration::hours(3);
    let mut watermark = Watermark::new(0);
    let sent = run_batch(vec![candidate(7, "old news", stale)], &mut watermark, now).await;
    assert!(sent.is_empty());
    assert_eq!(watermark.value(), 0);
}

#[tokio::test]
async fn a_candidate_exactly_at_the_window_boundary_is_notified() {
    let now = chrono::Utc::now();
    let boundary = now - chrono::Duration::hours(FRESHNESS_WINDOW_HOURS);
    let mut watermark = Watermark::new(0);
    let sent = run_batch(vec![candidate(7, "boundary", boundary)], &mut watermark, now).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(watermark.value(), 7);
}

#[tokio::test]
async fn long_bodies_are_truncated_with_a_literal_ellipsis() {
    let now = chrono::Utc::now();
    let mut watermark = Watermark::new(0);
    let body = "x".repeat(500);
    let sent = run_batch(vec![candidate(1, &body, now)], &mut watermark, now).await;
    let preview = sent[0]
        .split("*Body Preview*: ")
        .nth(1)
        .expect("notification must contain a preview");
    assert_eq!(preview, format!("{}...", "x".repeat(350)));
}

#[tokio::test]
async fn the_ellipsis_itself_is_never_escaped() {
    let now = chrono::Utc::now();
    let mut watermark = Watermark::new(0);
    let body = "*".repeat(400);
    let sent = run_batch(vec![candidate(1, &body, now)], &mut watermark, now).await;
    assert!(sent[0].ends_with("\\*..."));
}

#[tokio::test]
async fn short_bodies_are_not_given_an_ellipsis() {
    let now = chrono::Utc::now();
    let mut watermark = Watermark::new(0);
    let sent = run_batch(vec![candidate(1, "short", now)], &mut watermark, now).await;
    assert!(sent[0].ends_with("short"));
}

#[tokio::test]
async fn an_unparsable_candidate_does_not_abort_the_batch() {
    let now = chrono::Utc::now();
    let mut watermark = Watermark::new(0);
    let broken = Candidate {
        uid: 2,
        body: Vec::new(),
        arrived_at: Some(now.fixed_offset()),
    };
    let candidates = vec![candidate(1, "first", now), broken, candidate(3, "third", now)];
    let sent = run_batch(candidates, &mut watermark, now).await;
    assert_eq!(sent.len(), 2);
    assert!(sent[0].contains("first"));
    assert!(sent[1].contains("third"));
    assert_eq!(watermark.value(), 3);
}

#[tokio::test]
async fn a_missing_arrival_time_only_fails_that_candidate() {
    let now = chrono::Utc::now();
    let mut watermark = Watermark::new(0);
    let dateless = Candidate {
        uid: 2,
        body: message_bytes("test message", "no date"),
        arrived_at: None,
    };
    let candidates = vec![candidate(1, "first", now), dateless, candidate(3, "third", now)];
    let sent = run_batch(candidates, &mut watermark, now).await;
    assert_eq!(sent.len(), 2);
    assert_eq!(watermark.value(), 3);
}

#[tokio::test]
async fn notifications_follow_the_fixed_template() {
    let now = chrono::Utc::now();
    let mut watermark = Watermark::new(0);
    let sent = run_batch(vec![candidate(1, "Hello there", now)], &mut watermark, now).await;
    assert_eq!(
        sent[0],
        "*New email received for inbox@example.com*\n*From*: alice@example.com\n*Subject*: test message\n*Body Preview*: Hello there"
    );
}

#[tokio::test]
async fn sender_and_subject_are_markdown_escaped() {
    let now = chrono::Utc::now();
    let mut watermark = Watermark::new(0);
    let raw = concat!(
        "From: Alice Example <alice@example.com>\r\n",
        "Subject: [alert] disk_usage\r\n",
        "Content-Type: text/plain\r\n",
        "\r\n",
        "ok",
    )
    .as_bytes()
    .to_vec();
    let candidate = Candidate {
        uid: 1,
        body: raw,
        arrived_at: Some(now.fixed_offset()),
    };
    let sent = run_batch(vec![candidate], &mut watermark, now).await;
    assert!(sent[0].contains("*From*: Alice Example <alice@example.com\\>"));
    assert!(sent[0].contains("*Subject*: \\[alert\\] disk\\_usage"));
}

#[tokio::test]
async fn a_message_without_subject_still_notifies() {
    let now = chrono::Utc::now();
    let mut watermark = Watermark::new(0);
    let raw = b"From: alice@example.com\r\nContent-Type: text/plain\r\n\r\nbody".to_vec();
    let candidate = Candidate {
        uid: 1,
        body: raw,
        arrived_at: Some(now.fixed_offset()),
    };
    let sent = run_batch(vec![candidate], &mut watermark, now).await;
    assert!(sent[0].contains("*Subject*: \\(no subject\\)"));
}

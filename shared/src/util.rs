/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as record ID.
///
/// Layout (53 bits, safe for JavaScript numbers in the admin UI):
///   - 41 bits: milliseconds since 2024-01-01 UTC
///   - 12 bits: per-process sequence (random start)
pub fn snowflake_id() -> i64 {
    use std::sync::OnceLock;
    use std::sync::atomic::{AtomicU32, Ordering};

    const EPOCH_MS: i64 = 1_704_067_200_000;
    static SEQ: OnceLock<AtomicU32> = OnceLock::new();

    let seq = SEQ
        .get_or_init(|| {
            use rand::Rng;
            AtomicU32::new(rand::thread_rng().gen_range(0..0x1000))
        })
        .fetch_add(1, Ordering::Relaxed);
    let ts = (now_millis() - EPOCH_MS) & 0x1FF_FFFF_FFFF;
    (ts << 12) | (seq as i64 & 0xFFF)
}

use std::time::Duration;

use teloxide::types::Recipient;

use crate::{live::LiveCheck, recorder::Recorder, settings::recipient_name, Error};

/// What happened during one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// Not live, nothing done.
    Offline,
    /// Was live, and got recorded and sent.
    Recorded,
}

/// Check once if `uid` is live, and if so, record and send the stream to `chat`.
pub async fn check_once<L: LiveCheck, R: Recorder>(
    live: &L,
    recorder: &R,
    uid: u64,
    chat: &Recipient,
) -> Result<Cycle, Error> {
    if !live.is_streaming(uid).await? {
        return Ok(Cycle::Offline);
    }

    log::info!("uid {uid} went live, recording...");
    recorder.record_stream_and_send(uid, chat.clone()).await?;
    Ok(Cycle::Recorded)
}

/// Launches an ever-running loop that checks every `interval` if `uid` is
/// live, and records the stream if so.
///
/// Errors are logged and the loop carries on with the next check.
pub async fn run_monitor<L: LiveCheck, R: Recorder>(
    live: L,
    recorder: R,
    uid: u64,
    chat: Recipient,
    interval: Duration,
) {
    log::info!(
        "Watching uid {uid} every {} seconds, sending recordings to {}",
        interval.as_secs(),
        recipient_name(&chat)
    );

    loop {
        match check_once(&live, &recorder, uid, &chat).await {
            Ok(Cycle::Offline) => log::debug!("uid {uid} is not live"),
            Ok(Cycle::Recorded) => log::info!("Done with the stream of uid {uid}"),
            Err(e) => log::warn!("Error while checking uid {uid}: {e}"),
        }

        tokio::time::sleep(interval).await;
    }
}

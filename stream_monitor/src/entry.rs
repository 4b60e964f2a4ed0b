use teloxide::Bot;

use crate::{
    live::BilibiliLive, monitor::run_monitor, recorder::StreamlinkRecorder, settings::Settings,
};

/// A bot whose requests may run for as long as `settings.upload_timeout`,
/// since sending a recording takes a while.
///
/// # Panics
///
/// Panics if the HTTP client fails to build.
pub fn upload_bot(settings: &Settings) -> Bot {
    let client = teloxide::net::default_reqwest_settings()
        .timeout(settings.upload_timeout)
        .build()
        .expect("Failed to build the HTTP client!");
    Bot::with_client(&settings.bot_token, client)
}

/// # Panics
///
/// Panics if the settings in the environment are missing or invalid.
pub async fn entry() {
    let settings = Settings::from_env().unwrap_or_else(|e| panic!("Bad settings: {e}"));

    let bot = upload_bot(&settings);
    let live = BilibiliLive::new();
    let recorder = StreamlinkRecorder::new(bot, live.clone(), &settings);

    log::info!("Starting the monitor...");

    // The monitor gets a task of its own, so a stuck recording never holds up ctrl-c.
    let monitor = tokio::spawn(run_monitor(
        live,
        recorder,
        settings.live_uid,
        settings.chat_id,
        settings.check_interval,
    ));

    tokio::select! {
        result = monitor => {
            if let Err(e) = result {
                log::error!("Monitor task died: {e}");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            log::info!("Got ctrl-c, shutting down.");
        }
    }

    log::info!("it appears we have been bonked.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn uploads_outlast_the_default_timeout() {
        let vars: HashMap<&str, &str> = [
            ("BOT_TOKEN", "123:abc"),
            ("CHAT_ID", "@mychannel"),
            ("LIVE_UID", "1"),
        ]
        .into();
        let settings = Settings::from_lookup(|x| vars.get(x).map(|x| x.to_string())).unwrap();

        // teloxide's own client gives up after 17 seconds.
        assert!(settings.upload_timeout > std::time::Duration::from_secs(17));

        let bot = upload_bot(&settings);
        assert_eq!(bot.token(), "123:abc");
    }
}

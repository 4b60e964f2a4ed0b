use std::{
    future::Future,
    io,
    path::{Path, PathBuf},
    process::Stdio,
};

use chrono::{DateTime, TimeZone};
use tempfile::TempDir;
use teloxide::{
    payloads::SendDocumentSetters,
    requests::Requester,
    types::{InputFile, Recipient},
    Bot,
};

use crate::{
    live::{BilibiliLive, RoomInfo},
    settings::{recipient_name, Settings},
    Error,
};

/// Something that records a live stream until it ends and sends the
/// recording to a chat.
pub trait Recorder {
    fn record_stream_and_send(
        &self,
        uid: u64,
        chat: Recipient,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Records with [streamlink][], and uploads the recording to Telegram as a document.
///
/// [streamlink]: https://streamlink.github.io/
pub struct StreamlinkRecorder {
    bot: Bot,
    live: BilibiliLive,
    streamlink_path: PathBuf,
    record_dir: PathBuf,
}

/// Caption of a sent recording.
pub(crate) fn recording_caption<Tz: TimeZone>(
    uid: u64,
    room: &RoomInfo,
    started: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}\n{}\nuid {uid}, recording started {}",
        room.title,
        room.url,
        started.format("%Y-%m-%d %H:%M:%S %Z")
    )
}

impl StreamlinkRecorder {
    pub fn new(bot: Bot, live: BilibiliLive, settings: &Settings) -> StreamlinkRecorder {
        StreamlinkRecorder {
            bot,
            live,
            streamlink_path: settings.streamlink_path.clone(),
            record_dir: settings.record_dir.clone(),
        }
    }

    /// Make a fresh directory in the recording directory. It gets deleted
    /// along with everything in it when dropped.
    async fn scratch_dir(&self) -> io::Result<TempDir> {
        let record_dir = self.record_dir.clone();
        tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix("stream_monitor")
                .tempdir_in(record_dir)
        })
        .await
        .map_err(io::Error::other)?
    }

    /// Run streamlink on `url` until it exits, writing into `path`.
    ///
    /// Returns the size of the recording. A recording cut off by a failing
    /// streamlink still counts, as long as something got written.
    pub async fn capture(&self, url: &str, path: &Path) -> Result<u64, Error> {
        log::info!("Recording {url} into {}", path.display());

        // Streamlink exits by itself once the stream ends.
        let status = tokio::process::Command::new(&self.streamlink_path)
            .arg(url)
            .arg("best")
            .arg("--output")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await?;

        let recorded_size = tokio::fs::metadata(path)
            .await
            .map(|x| x.len())
            .unwrap_or(0);

        if recorded_size == 0 {
            return Err(Error::EmptyRecording(status));
        }

        if !status.success() {
            log::warn!("Streamlink exited with {status}, sending the partial recording");
        }

        Ok(recorded_size)
    }

    /// Record the stream of `room` and send it to `chat`.
    async fn record_room(&self, uid: u64, room: &RoomInfo, chat: Recipient) -> Result<(), Error> {
        if room.url.is_empty() {
            return Err(Error::NoRoom(uid));
        }

        let dir = self.scratch_dir().await?;

        let started = chrono::Local::now();
        let file_path = dir
            .path()
            .join(format!("{uid}-{}.flv", started.format("%Y%m%d-%H%M%S")));

        let recorded_size = self.capture(&room.url, &file_path).await?;

        log::info!(
            "Recorded {recorded_size} bytes, sending to {}",
            recipient_name(&chat)
        );

        self.bot
            .send_document(chat, InputFile::file(&file_path))
            .caption(recording_caption(uid, room, &started))
            .await?;

        log::info!("Sent the recording of uid {uid}");
        Ok(())
    }
}

impl Recorder for StreamlinkRecorder {
    async fn record_stream_and_send(&self, uid: u64, chat: Recipient) -> Result<(), Error> {
        let room = self.live.room_info(uid).await?;
        self.record_room(uid, &room, chat).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::{os::unix::fs::PermissionsExt, time::Duration};
    use teloxide::types::ChatId;

    /// A recorder running `script` in place of streamlink. The script gets
    /// the output path as `$4`.
    fn recorder_with(script: &str) -> (TempDir, StreamlinkRecorder) {
        let dir = tempfile::tempdir().unwrap();
        let streamlink_path = dir.path().join("streamlink");
        std::fs::write(&streamlink_path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&streamlink_path, std::fs::Permissions::from_mode(0o755))
            .unwrap();

        let record_dir = dir.path().join("records");
        std::fs::create_dir(&record_dir).unwrap();

        let settings = Settings {
            bot_token: "123:abc".into(),
            chat_id: Recipient::Id(ChatId(-100)),
            live_uid: 1,
            check_interval: Duration::from_secs(600),
            upload_timeout: Duration::from_secs(3600),
            streamlink_path,
            record_dir,
        };

        let recorder = StreamlinkRecorder::new(
            Bot::new(&settings.bot_token),
            BilibiliLive::new(),
            &settings,
        );
        (dir, recorder)
    }

    #[tokio::test]
    async fn finished_recordings() {
        let (dir, recorder) = recorder_with("printf 'flvdata' > \"$4\"");
        let path = dir.path().join("out.flv");

        let size = recorder.capture("https://live.bilibili.com/1", &path).await;
        assert_eq!(size.unwrap(), 7);
    }

    #[tokio::test]
    async fn cut_off_recordings_are_kept() {
        let (dir, recorder) = recorder_with("printf 'flv' > \"$4\"\nexit 1");
        let path = dir.path().join("out.flv");

        let size = recorder.capture("https://live.bilibili.com/1", &path).await;
        assert_eq!(size.unwrap(), 3);
    }

    #[tokio::test]
    async fn empty_recordings_fail() {
        let (dir, recorder) = recorder_with("exit 0");
        let path = dir.path().join("out.flv");
        let result = recorder.capture("https://live.bilibili.com/1", &path).await;
        assert!(matches!(result, Err(Error::EmptyRecording(_))));

        let (dir, recorder) = recorder_with(": > \"$4\"\nexit 1");
        let path = dir.path().join("out.flv");
        let result = recorder.capture("https://live.bilibili.com/1", &path).await;
        match result {
            Err(Error::EmptyRecording(status)) => assert!(!status.success()),
            other => panic!("Unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_recordings_leave_nothing_behind() {
        let (_dir, recorder) = recorder_with("printf 'x' > \"$4.part\"\nexit 1");
        let room = RoomInfo {
            url: "https://live.bilibili.com/1".into(),
            ..Default::default()
        };

        let result = recorder
            .record_room(1, &room, Recipient::Id(ChatId(-100)))
            .await;
        assert!(matches!(result, Err(Error::EmptyRecording(_))));

        let leftovers = std::fs::read_dir(&recorder.record_dir).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn users_without_rooms() {
        let (_dir, recorder) = recorder_with("exit 0");
        let result = recorder
            .record_room(42, &RoomInfo::default(), Recipient::Id(ChatId(-100)))
            .await;
        assert!(matches!(result, Err(Error::NoRoom(42))));
    }

    #[test]
    fn captions() {
        let room = RoomInfo {
            url: "https://live.bilibili.com/21452505".into(),
            title: "hello".into(),
            ..Default::default()
        };
        let started = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 20, 30, 0).unwrap();

        assert_eq!(
            recording_caption(21452505, &room, &started),
            "hello\nhttps://live.bilibili.com/21452505\n\
             uid 21452505, recording started 2024-05-01 20:30:00 UTC"
        );
    }
}

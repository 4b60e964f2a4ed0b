use std::{future::Future, time::Duration};

use reqwest::{header, Client};
use serde::Deserialize;

use crate::Error;

/// Something that can tell if a broadcaster is live right now.
pub trait LiveCheck {
    fn is_streaming(&self, uid: u64) -> impl Future<Output = Result<bool, Error>> + Send;
}

const ROOM_INFO_URL: &str = "https://api.live.bilibili.com/room/v1/Room/getRoomInfoOld";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const REFERER: &str = "https://live.bilibili.com";

/// Live room of a Bilibili user, as far as we care about it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RoomInfo {
    /// 1 if the user has a live room at all.
    #[serde(rename = "roomStatus")]
    pub room_status: u8,
    /// 1 if live, 0 if offline, 2 if playing a replay carousel.
    #[serde(rename = "liveStatus")]
    pub live_status: u8,
    #[serde(rename = "roomid")]
    pub room_id: u64,
    pub url: String,
    pub title: String,
}

impl RoomInfo {
    pub fn is_live(&self) -> bool {
        self.live_status == 1
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    code: i64,
    #[serde(default)]
    message: String,
    data: Option<RoomInfo>,
}

/// Parse a response of the room info API.
pub fn parse_room_info(body: &str) -> Result<RoomInfo, Error> {
    let response: ApiResponse = serde_json::from_str(body)?;

    if response.code != 0 {
        return Err(Error::Api {
            code: response.code,
            message: response.message,
        });
    }

    // Users without a room get an empty `data`.
    Ok(response.data.unwrap_or_default())
}

/// Live detection through Bilibili's public live API.
#[derive(Debug, Clone)]
pub struct BilibiliLive {
    client: Client,
}

impl BilibiliLive {
    /// # Panics
    ///
    /// Panics if the HTTP client fails to build, which only happens if TLS is
    /// unavailable on this system.
    pub fn new() -> BilibiliLive {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build the HTTP client!");
        BilibiliLive { client }
    }

    /// Fetch info on the live room of user `uid`.
    pub async fn room_info(&self, uid: u64) -> Result<RoomInfo, Error> {
        let body = self
            .client
            .get(ROOM_INFO_URL)
            .query(&[("mid", uid)])
            .header(header::REFERER, REFERER)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_room_info(&body)
    }
}

impl Default for BilibiliLive {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveCheck for BilibiliLive {
    async fn is_streaming(&self, uid: u64) -> Result<bool, Error> {
        let room = self.room_info(uid).await?;
        log::debug!(
            "Room {} of uid {uid}: room status {}, live status {}",
            room.room_id,
            room.room_status,
            room.live_status
        );
        Ok(room.is_live())
    }
}

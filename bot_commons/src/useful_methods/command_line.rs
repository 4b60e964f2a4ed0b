/// A bot command split into its parts.
///
/// For the message `/BanUid@Some_Bot 1234 5678`, the callname is `/banuid`
/// and the parameters are `1234 5678`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine<'a> {
    callname: String,
    params: &'a str,
}

impl<'a> CommandLine<'a> {
    /// Parse `text` as a command addressed to a bot with username `bot_username`.
    ///
    /// Returns [`None`] if the text does not look like a command, or if it's
    /// explicitly addressed to some other bot.
    pub fn parse(text: &'a str, bot_username: &str) -> Option<CommandLine<'a>> {
        if !text.starts_with('/') {
            return None;
        }

        let command = text.split_whitespace().next()?;

        if !command.is_ascii() {
            // Telegram commands must be ASCII.
            // See https://core.telegram.org/bots/api#botcommand
            return None;
        }

        let params = text[command.len()..].trim_start();

        // If the command is "/banuid@Some_Bot", trim the "@" and everything after it.
        let callname = if let Some(username_start) = command.find('@') {
            // Bot names are guaranteed ASCII, so ignore ASCII case specifically.
            let addressee = &command[username_start + '@'.len_utf8()..];
            if !addressee.eq_ignore_ascii_case(bot_username) {
                // This command is not for us.
                return None;
            }
            &command[..username_start]
        } else {
            command
        };

        if callname.len() <= 1 {
            return None;
        }

        Some(CommandLine {
            callname: callname.to_ascii_lowercase(),
            params,
        })
    }

    /// Lowercase command name, including the leading `/`.
    #[inline]
    pub fn callname(&self) -> &str {
        &self.callname
    }

    /// Everything after the command, with leading whitespace trimmed.
    #[inline]
    pub fn params(&self) -> &'a str {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::CommandLine;

    #[test]
    fn plain_command() {
        let line = CommandLine::parse("/banuid 1234", "Mod_Bot").unwrap();
        assert_eq!(line.callname(), "/banuid");
        assert_eq!(line.params(), "1234");

        let line = CommandLine::parse("/InitGroup", "Mod_Bot").unwrap();
        assert_eq!(line.callname(), "/initgroup");
        assert_eq!(line.params(), "");
    }

    #[test]
    fn addressed_commands() {
        let line = CommandLine::parse("/unbanuid@mod_bot   42  ", "Mod_Bot").unwrap();
        assert_eq!(line.callname(), "/unbanuid");
        assert_eq!(line.params(), "42  ");

        assert_eq!(CommandLine::parse("/unbanuid@Other_Bot 42", "Mod_Bot"), None);
    }

    #[test]
    fn not_commands() {
        assert_eq!(CommandLine::parse("hi /banuid 1", "Mod_Bot"), None);
        assert_eq!(CommandLine::parse("/", "Mod_Bot"), None);
        assert_eq!(CommandLine::parse("/@Mod_Bot", "Mod_Bot"), None);
        assert_eq!(CommandLine::parse("/бан 1", "Mod_Bot"), None);
        assert_eq!(CommandLine::parse("", "Mod_Bot"), None);
    }
}

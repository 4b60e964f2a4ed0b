use bot_commons::*;

fn main() {
    start_everything("WARN,moderation_bot=debug", moderation_bot::entry());
}

//! CLI message posting.

use crate::cli::{Cli, PostArgs};
use crate::message::Message;

/// Handle `slackhook post <text>`.
pub async fn handle(cli: &Cli, args: &PostArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = cli.token_store();
    let client = cli.client(&store)?;

    if let Some(channel) = &args.channel {
        let message = Message::plain(&args.text).with_channel(channel);
        let response = client.call_api("chat.postMessage", &message).await?;
        let ts = response.get("ts").and_then(|v| v.as_str()).unwrap_or_default();
        println!("✅ Posted to {channel} ({ts})");
        return Ok(());
    }

    let message = Message::plain(&args.text);
    let delivered = match &args.url {
        Some(url) => client.post_message_to(url, &message).await?,
        None => client.post_message(&message).await?,
    };
    if delivered {
        println!("✅ Message delivered");
    } else {
        println!("⚠️  Slack accepted the request but did not answer ok");
    }
    Ok(())
}

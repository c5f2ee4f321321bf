//! Server-rendered HTML pages

pub mod flash;

use axum::response::Html;
use chrono::{DateTime, Local, Utc};
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

use crate::auth::CurrentUser;
use crate::conversation::{Conversation, Message, Role};

pub use flash::{Flash, Notice};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f6f7f9; color: #1f2328; }
nav { display: flex; gap: 1rem; padding: .75rem 1.5rem; background: #1f2328; }
nav a { color: #fff; text-decoration: none; }
main { max-width: 60rem; margin: 1.5rem auto; padding: 0 1rem; }
.flash { padding: .5rem 1rem; border-radius: 4px; margin-bottom: 1rem; }
.flash.error { background: #ffebe9; color: #82071e; }
.flash.success { background: #dafbe1; color: #116329; }
.chat { display: grid; grid-template-columns: 16rem 1fr; gap: 1.5rem; }
.sidebar ul { list-style: none; padding: 0; }
.sidebar li { display: flex; justify-content: space-between; align-items: center; padding: .25rem 0; }
.sidebar li.active a { font-weight: bold; }
.message { background: #fff; border-radius: 6px; padding: .75rem 1rem; margin-bottom: .75rem; }
.message.user { border-left: 4px solid #0969da; }
.message.assistant { border-left: 4px solid #8250df; }
.message .meta { font-size: .8rem; color: #57606a; margin-bottom: .25rem; }
textarea { width: 100%; min-height: 5rem; }
"#;

/// Escape text for HTML element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Link targets that would run code when followed
fn is_unsafe_url(url: &str) -> bool {
    let scheme = url.trim_start().to_ascii_lowercase();
    ["javascript:", "vbscript:", "data:"]
        .iter()
        .any(|prefix| scheme.starts_with(prefix))
}

fn neutralize(url: CowStr<'_>) -> CowStr<'_> {
    if is_unsafe_url(&url) {
        CowStr::Borrowed("#")
    } else {
        url
    }
}

/// Render message text as Markdown; raw HTML is shown as text
pub fn render_text(text: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let events = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: neutralize(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: neutralize(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

/// `HH:MM` clock time of a timestamp in the server's local zone
pub fn format_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

fn layout(title: &str, signed_in: bool, flashes: &[Flash], body: &str) -> Html<String> {
    let nav = if signed_in {
        r#"<a href="/chat">Chat</a><a href="/profile">Profile</a><a href="/logout">Logout</a>"#
    } else {
        r#"<a href="/login">Login</a><a href="/register">Register</a>"#
    };

    let flashes: String = flashes
        .iter()
        .map(|f| {
            format!(
                r#"<div class="flash {}">{}</div>"#,
                f.level.as_str(),
                escape(&f.message)
            )
        })
        .collect();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Liaotian</title>
<style>{style}</style>
</head>
<body>
<nav>{nav}</nav>
<main>
{flashes}
{body}
</main>
</body>
</html>"#,
        title = escape(title),
        style = STYLE,
    ))
}

fn credentials_form(action: &str, submit: &str, footer: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
<p><label>Username<br><input name="username" autocomplete="username" required></label></p>
<p><label>Password<br><input name="password" type="password" required></label></p>
<p><button type="submit">{submit}</button></p>
</form>
<p>{footer}</p>"#
    )
}

pub fn login_page(flashes: &[Flash]) -> Html<String> {
    let body = format!(
        "<h1>Log in</h1>\n{}",
        credentials_form(
            "/login",
            "Log in",
            r#"No account yet? <a href="/register">Register</a>"#
        )
    );
    layout("Log in", false, flashes, &body)
}

pub fn register_page(flashes: &[Flash]) -> Html<String> {
    let body = format!(
        "<h1>Register</h1>\n{}",
        credentials_form(
            "/register",
            "Register",
            r#"Already registered? <a href="/login">Log in</a>"#
        )
    );
    layout("Register", false, flashes, &body)
}

pub fn profile_page(current: &CurrentUser, conversation_count: usize) -> Html<String> {
    let body = format!(
        r#"<h1>Profile</h1>
<dl>
<dt>Username</dt><dd>{username}</dd>
<dt>User ID</dt><dd><code>{id}</code></dd>
<dt>Conversations</dt><dd>{conversation_count}</dd>
<dt>Signed in since</dt><dd>{since}</dd>
</dl>
<p><a href="/chat">Go to chat</a></p>"#,
        username = escape(&current.user.username),
        id = escape(&current.user.id),
        since = current
            .session
            .created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M"),
    );
    layout("Profile", true, &[], &body)
}

/// Everything the chat page shows
pub struct ChatView<'a> {
    pub username: &'a str,
    pub conversations: &'a [Conversation],
    pub selected: Option<&'a Conversation>,
    pub suggestions: &'a [String],
    pub flashes: &'a [Flash],
}

pub fn chat_page(view: &ChatView<'_>) -> Html<String> {
    let selected_id = view.selected.map(|c| c.id.as_str());

    let mut sidebar = String::from(
        r#"<aside class="sidebar"><p><a href="/chat">+ New chat</a></p><ul>"#,
    );
    for conversation in view.conversations {
        let id = escape(&conversation.id);
        let class = if Some(conversation.id.as_str()) == selected_id {
            " class=\"active\""
        } else {
            ""
        };
        sidebar.push_str(&format!(
            r#"<li{class}><a href="/chat?chat_id={id}">{title}</a><form method="post" action="/delete_chat/{id}"><button type="submit" title="Delete">×</button></form></li>"#,
            title = escape(&conversation.title),
        ));
    }
    sidebar.push_str("</ul></aside>");

    let mut content = String::from(r#"<section class="conversation">"#);
    match view.selected {
        Some(conversation) => {
            content.push_str(&format!("<h2>{}</h2>", escape(&conversation.title)));
            for message in &conversation.messages {
                content.push_str(&message_html(message, view.username));
            }
        }
        None => {
            content.push_str("<h2>Start a new conversation</h2>");
            if !view.suggestions.is_empty() {
                content.push_str(r#"<div class="suggestions">"#);
                for suggestion in view.suggestions {
                    let suggestion = escape(suggestion);
                    content.push_str(&format!(
                        r#"<form method="post" action="/chat"><input type="hidden" name="prompt" value="{suggestion}"><button type="submit">{suggestion}</button></form>"#
                    ));
                }
                content.push_str("</div>");
            }
        }
    }

    let action = match selected_id {
        Some(id) => format!("/chat?chat_id={}", escape(id)),
        None => "/chat".to_string(),
    };
    content.push_str(&format!(
        r#"<form method="post" action="{action}"><textarea name="prompt" placeholder="Ask anything..." required></textarea><p><button type="submit">Send</button></p></form></section>"#
    ));

    let body = format!(r#"<div class="chat">{sidebar}{content}</div>"#);
    let title = view.selected.map_or("Chat", |c| c.title.as_str());
    layout(title, true, view.flashes, &body)
}

fn message_html(message: &Message, username: &str) -> String {
    let author = match message.role {
        Role::User => escape(username),
        Role::Assistant => "Assistant".to_string(),
    };
    format!(
        r#"<div class="message {role}"><div class="meta">{author} · {time}</div><div class="content">{content}</div></div>"#,
        role = message.role.as_str(),
        time = format_time(&message.timestamp),
        content = render_text(&message.content),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Reply;
    use chrono::{TimeZone, Timelike};

    fn conversation(prompt: &str) -> Conversation {
        Conversation::start(
            prompt,
            Reply {
                content: format!("Reply to {}", prompt),
                timestamp: Utc::now(),
            },
        )
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_render_text_paragraphs() {
        let html = render_text("one\n\ntwo");
        assert!(html.contains("<p>one</p>"));
        assert!(html.contains("<p>two</p>"));
        assert_eq!(render_text(""), "");
    }

    #[test]
    fn test_render_text_markdown() {
        assert!(render_text("**bold**").contains("<strong>bold</strong>"));
        assert!(render_text("*soft*").contains("<em>soft</em>"));
        assert!(render_text("use `code` here").contains("<code>code</code>"));

        let list = render_text("- a\n- b");
        assert!(list.contains("<ul>"));
        assert!(list.contains("<li>a</li>"));
        assert!(list.contains("<li>b</li>"));

        let block = render_text("```\nfn main() {}\n```");
        assert!(block.contains("<pre><code>fn main() {}"));
    }

    #[test]
    fn test_render_text_escapes_raw_html() {
        let block = render_text("<script>alert(1)</script>");
        assert!(!block.contains("<script>"));
        assert!(block.contains("&lt;script&gt;"));

        let inline = render_text("hi <b onmouseover=x>there</b>");
        assert!(!inline.contains("<b "));
        assert!(inline.contains("&lt;b onmouseover=x&gt;"));
    }

    #[test]
    fn test_render_text_neutralizes_script_links() {
        let html = render_text("[click](javascript:alert(1))");
        assert!(!html.contains("javascript:"));
        assert!(html.contains(r##"<a href="#">click</a>"##));

        let safe = render_text("[docs](https://example.com)");
        assert!(safe.contains(r#"<a href="https://example.com">docs</a>"#));
    }

    #[test]
    fn test_format_time_uses_local_zone() {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 59).unwrap();
        let local = timestamp.with_timezone(&Local);

        let formatted = format_time(&timestamp);
        assert_eq!(formatted, format!("{:02}:{:02}", local.hour(), local.minute()));
        assert_eq!(formatted.len(), 5);
        assert_eq!(&formatted[2..3], ":");
    }

    #[test]
    fn test_login_page_shows_flashes() {
        let Html(page) = login_page(&[Flash::error("Invalid username or password")]);
        assert!(page.contains(r#"class="flash error""#));
        assert!(page.contains("Invalid username or password"));
        assert!(page.contains(r#"action="/login""#));
    }

    #[test]
    fn test_chat_page_without_selection_shows_suggestions() {
        let conversations = vec![conversation("First chat")];
        let suggestions = vec!["Tell me a joke".to_string()];
        let Html(page) = chat_page(&ChatView {
            username: "alice",
            conversations: &conversations,
            selected: None,
            suggestions: &suggestions,
            flashes: &[],
        });

        assert!(page.contains("First chat"));
        assert!(page.contains("Tell me a joke"));
        assert!(page.contains(&format!("/delete_chat/{}", conversations[0].id)));
        assert!(page.contains(r#"<form method="post" action="/chat"><textarea"#));
    }

    #[test]
    fn test_chat_page_with_selection_shows_messages() {
        let conversations = vec![conversation("<script>alert(1)</script>")];
        let Html(page) = chat_page(&ChatView {
            username: "alice",
            conversations: &conversations,
            selected: conversations.first(),
            suggestions: &["unused".to_string()],
            flashes: &[],
        });

        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains(r#"class="message user""#));
        assert!(page.contains(r#"class="message assistant""#));
        assert!(page.contains(&format!(r#"action="/chat?chat_id={}""#, conversations[0].id)));
        assert!(!page.contains("unused"));
    }
}

//! HTML tokenizer adapter.
//!
//! Collects html5ever's token stream into a flat list of owned tag events,
//! decoupling the node tree builder from the tokenizer's callback API. The
//! tree-construction stage of html5ever is deliberately not used: the
//! builder wants the raw tag stream, with no implied tags or auto-closing.

use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

/// One markup event in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEvent {
    Open {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Close {
        name: String,
    },
}

/// Token sink that records events as they stream past.
///
/// Interior mutability because html5ever's `TokenSink` methods take `&self`.
#[derive(Default)]
struct EventSink {
    events: RefCell<Vec<TagEvent>>,
}

impl EventSink {
    fn into_events(self) -> Vec<TagEvent> {
        self.events.into_inner()
    }
}

impl TokenSink for EventSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => {
                let name = tag.name.to_string();
                match tag.kind {
                    TagKind::StartTag => {
                        let attrs = tag
                            .attrs
                            .iter()
                            .map(|a| (a.name.local.to_string(), a.value.to_string()))
                            .collect();
                        let mut events = self.events.borrow_mut();
                        events.push(TagEvent::Open {
                            name: name.clone(),
                            attrs,
                        });
                        // A self-closing start tag never gets an end tag
                        // from the document; synthesize one.
                        if tag.self_closing {
                            events.push(TagEvent::Close { name: name.clone() });
                        }
                        drop(events);
                        // script/style contents must arrive as raw text so
                        // the builder can discard them without seeing
                        // phantom tags.
                        match name.as_str() {
                            "script" => return TokenSinkResult::RawData(RawKind::ScriptData),
                            "style" => return TokenSinkResult::RawData(RawKind::Rawtext),
                            _ => {}
                        }
                    }
                    TagKind::EndTag => {
                        self.events.borrow_mut().push(TagEvent::Close { name });
                    }
                }
            }
            Token::CharacterTokens(text) => {
                let mut events = self.events.borrow_mut();
                if let Some(TagEvent::Text(last)) = events.last_mut() {
                    last.push_str(&text);
                } else {
                    events.push(TagEvent::Text(text.to_string()));
                }
            }
            // Lenient like a browser: comments, doctypes, null characters
            // and tokenizer errors carry nothing we keep.
            Token::CommentToken(_)
            | Token::DoctypeToken(_)
            | Token::NullCharacterToken
            | Token::ParseError(_)
            | Token::EOFToken => {}
        }
        TokenSinkResult::Continue
    }
}

/// Tokenize a document into owned tag events.
pub fn collect_events(html: &str) -> Vec<TagEvent> {
    let sink = EventSink::default();
    let tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    let input = BufferQueue::default();
    input.push_back(StrTendril::from(html));
    let _ = tokenizer.feed(&input);
    tokenizer.end();
    tokenizer.sink.into_events()
}

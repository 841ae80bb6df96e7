use anyhow::Result;
use console::style;

use crate::prompt::{InputType, Prompt};
use magpie::session::Session;

pub struct Repl<'a> {
    session: Session,
    prompt: Box<dyn Prompt + 'a>,
}

impl<'a> Repl<'a> {
    pub fn new(session: Session, prompt: Box<impl Prompt + 'a>) -> Self {
        Repl { session, prompt }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn run(&mut self) -> Result<()> {
        self.prompt.ready();

        loop {
            let input = self.prompt.get_input()?;
            match input.input_type {
                InputType::Message => {
                    let Some(content) = input.content else {
                        continue;
                    };

                    self.prompt.show_busy();
                    let outcome = self.session.reply(&content).await;
                    self.prompt.hide_busy();

                    match outcome {
                        Ok(messages) => {
                            for message in messages {
                                self.prompt.render(Box::new(message));
                            }
                        }
                        Err(e) => {
                            eprintln!("{}", style(format!("An error occurred: {}", e)).red());
                        }
                    }
                }
                InputType::Clear => {
                    self.session.reset();
                    println!("{}", style("Conversation cleared.").dim());
                }
                InputType::AskAgain => continue,
                InputType::Exit => break,
            }
        }

        self.prompt.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Input;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use magpie::models::message::Message;
    use magpie::models::tool::Tool;
    use magpie::providers::base::{Provider, Usage};
    use magpie::store::Store;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    // Library test doubles are compiled out of the published crate, so the
    // repl tests carry their own small copies.

    struct ScriptedProvider {
        responses: Mutex<VecDeque<Message>>,
        fail: bool,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Message>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        async fn complete(
            &self,
            _messages: &[Message],
            _tools: &[Tool],
        ) -> Result<(Message, Usage)> {
            if self.fail {
                return Err(anyhow!("scripted provider failure"));
            }
            let response = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Message::assistant().with_text(""));
            Ok((response, Usage::default()))
        }
    }

    struct TinyStore;

    #[async_trait]
    impl Store for TinyStore {
        async fn keys(&self) -> Result<Vec<String>> {
            Ok(vec!["user:1".to_string()])
        }
        async fn key_type(&self, key: &str) -> Result<String> {
            Ok(if key == "user:1" { "hash" } else { "none" }.to_string())
        }
        async fn hash_fields(&self, _key: &str) -> Result<Vec<String>> {
            Ok(vec!["name".to_string()])
        }
        async fn hash_get(&self, _key: &str, field: &str) -> Result<Option<String>> {
            Ok((field == "name").then(|| "Alice".to_string()))
        }
        async fn hash_get_all(&self, _key: &str) -> Result<Vec<(String, String)>> {
            Ok(vec![("name".to_string(), "Alice".to_string())])
        }
    }

    struct ScriptedPrompt {
        inputs: VecDeque<Input>,
        rendered: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedPrompt {
        fn new(inputs: Vec<Input>, rendered: Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                inputs: inputs.into(),
                rendered,
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn render(&mut self, message: Box<Message>) {
            self.rendered.lock().unwrap().push(message.text());
        }
        fn get_input(&mut self) -> Result<Input> {
            Ok(self.inputs.pop_front().unwrap_or(Input {
                input_type: InputType::Exit,
                content: None,
            }))
        }
        fn show_busy(&mut self) {}
        fn hide_busy(&self) {}
        fn close(&self) {}
        fn ready(&self) {}
    }

    fn message_input(text: &str) -> Input {
        Input {
            input_type: InputType::Message,
            content: Some(text.to_string()),
        }
    }

    async fn build_repl(
        provider: ScriptedProvider,
        inputs: Vec<Input>,
    ) -> (Repl<'static>, Arc<Mutex<Vec<String>>>) {
        let session = Session::new(Box::new(provider), Box::new(TinyStore))
            .await
            .unwrap();
        let rendered = Arc::new(Mutex::new(Vec::new()));
        let prompt = ScriptedPrompt::new(inputs, rendered.clone());
        (Repl::new(session, Box::new(prompt)), rendered)
    }

    #[tokio::test]
    async fn test_renders_direct_reply() {
        let provider = ScriptedProvider::new(vec![Message::assistant().with_text("Hello!")]);
        let (mut repl, rendered) = build_repl(provider, vec![message_input("Hi")]).await;

        repl.run().await.unwrap();

        assert_eq!(rendered.lock().unwrap().as_slice(), ["Hello!"]);
        assert_eq!(repl.session().messages().len(), 3);
    }

    #[tokio::test]
    async fn test_clear_resets_conversation() {
        let provider = ScriptedProvider::new(vec![Message::assistant().with_text("Hello!")]);
        let inputs = vec![
            message_input("Hi"),
            Input {
                input_type: InputType::Clear,
                content: None,
            },
        ];
        let (mut repl, _) = build_repl(provider, inputs).await;

        repl.run().await.unwrap();

        assert_eq!(repl.session().messages().len(), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_keeps_repl_alive() {
        let provider = ScriptedProvider::failing();
        let inputs = vec![message_input("Hi"), message_input("still there?")];
        let (mut repl, rendered) = build_repl(provider, inputs).await;

        repl.run().await.unwrap();

        // Both turns errored and were surfaced, not rendered as replies
        assert!(rendered.lock().unwrap().is_empty());
        assert_eq!(repl.session().messages().len(), 1);
    }
}

use anyhow::Result;
use magpie::models::message::Message;

pub mod rustyline;
pub mod thinking;

pub trait Prompt {
    fn render(&mut self, message: Box<Message>);
    fn get_input(&mut self) -> Result<Input>;
    fn show_busy(&mut self);
    fn hide_busy(&self);
    fn close(&self);
    fn ready(&self) {
        println!();
        println!("Ask a question about the records in your store, or /help for commands.");
        println!();
    }
}

pub struct Input {
    pub input_type: InputType,
    pub content: Option<String>, // Optional content as sometimes the user may be issuing a command eg. (Exit)
}

pub enum InputType {
    AskAgain, // Ask the user for input again. Control flow command.
    Message,  // User sent a message
    Clear,    // User wants to reset the conversation
    Exit,     // User wants to exit the session
}

pub enum Theme {
    Light,
    Dark,
}

//! Driving the numbered console menu with scripted input.

use std::io::Cursor;
use std::sync::Arc;

use dsagent::{ConsoleMenu, EchoGenerationClient, PromptDispatcher};

async fn run_script(client: Arc<EchoGenerationClient>, script: &str) -> (String, usize) {
    let dispatcher = Arc::new(PromptDispatcher::new(client));
    let mut menu = ConsoleMenu::new(dispatcher, Cursor::new(script.to_string()), Vec::new());
    menu.run().await.expect("menu run");
    let transcript_len = menu.transcript().len();
    let output = String::from_utf8(menu.into_output()).expect("utf8 output");
    (output, transcript_len)
}

#[tokio::test]
async fn exit_option_ends_the_loop() {
    let client = Arc::new(EchoGenerationClient::new());
    let (output, _) = run_script(client.clone(), "7\n1\nnever read\n").await;

    assert!(output.contains("MENU OPTIONS:"));
    assert!(output.contains("Thank you for using Data Science Expert AI Agent!"));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn generate_questions_with_blank_count_uses_five() {
    let client = Arc::new(EchoGenerationClient::new());
    let (output, _) = run_script(client.clone(), "1\nNeural Networks\n\n7\n").await;

    assert_eq!(client.call_count(), 1);
    let prompt = client.last_prompt().unwrap();
    assert!(prompt.contains("generate 5 expert-level questions on Neural Networks."));
    assert!(output.contains("Generating questions..."));
    assert!(output.contains(&prompt));
}

#[tokio::test]
async fn invalid_question_count_returns_to_menu() {
    let client = Arc::new(EchoGenerationClient::new());
    let (output, _) = run_script(client.clone(), "1\nNLP\nlots\n7\n").await;

    assert_eq!(client.call_count(), 0);
    assert!(output.contains("Invalid number of questions: lots"));
}

#[tokio::test]
async fn review_reads_code_until_two_blank_lines() {
    let client = Arc::new(EchoGenerationClient::new());
    let script = "3\nimport numpy as np\n\nx = np.zeros(3)\n\n\nvectorized ops\n7\n";
    run_script(client.clone(), script).await;

    let prompt = client.last_prompt().unwrap();
    assert!(prompt.contains(
        "Context: vectorized ops\n\nCode:\n```\nimport numpy as np\n\nx = np.zeros(3)\n```"
    ));
}

#[tokio::test]
async fn chat_records_transcript_and_reset_clears_it() {
    let client = Arc::new(EchoGenerationClient::new());
    let (output, transcript_len) =
        run_script(client.clone(), "5\nhello\n5\nagain\n6\n5\nthird\n7\n").await;

    assert_eq!(client.call_count(), 3);
    assert!(output.contains("Conversation reset successfully!"));
    assert_eq!(transcript_len, 1);

    // History is display-only: later prompts never carry earlier messages.
    let prompts = client.prompts();
    assert!(prompts[1].ends_with("\n\nagain"));
    assert!(!prompts[1].contains("hello"));
}

#[tokio::test]
async fn request_failure_is_reported_and_menu_continues() {
    let client = Arc::new(EchoGenerationClient::failing("API key not valid"));
    let (output, _) = run_script(client.clone(), "2\nWhat is PCA?\n4\nSlow joins\n7\n").await;

    assert_eq!(client.call_count(), 2);
    assert_eq!(output.matches("❌ Error: Generation error: API key not valid").count(), 2);
    assert!(output.contains("Thank you for using"));
}

#[tokio::test]
async fn blank_input_and_unknown_choice_do_not_call_the_model() {
    let client = Arc::new(EchoGenerationClient::new());
    let (output, _) = run_script(client.clone(), "2\n   \n9\n7\n").await;

    assert_eq!(client.call_count(), 0);
    assert!(output.contains("Please enter a question"));
    assert!(output.contains("Invalid choice. Please try again."));
}

#[tokio::test]
async fn end_of_input_stops_cleanly() {
    let client = Arc::new(EchoGenerationClient::new());
    let (output, _) = run_script(client.clone(), "4\n").await;

    assert_eq!(client.call_count(), 0);
    assert!(output.contains("Describe your problem:"));
}

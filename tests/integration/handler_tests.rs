use mentor_bot::events::EventKind;
use mentor_bot::handlers::command_handler::{GET_DATA_ERROR, WELCOME_MESSAGE};
use mentor_bot::utils::{MessageFormatter, MAX_MESSAGE_LENGTH};

use super::mock_bot::{MockTelegramBot, BOT_USERNAME};
use super::mock_store::{FailingStore, MemoryStore};
use super::test_utils::TestUserBuilder;

#[tokio::test]
async fn test_start_twice_keeps_one_user_with_latest_names() {
    let store = MemoryStore::new();
    let bot = MockTelegramBot::new();

    let first = TestUserBuilder::new(100).first_name("Ada").build();
    let renamed = TestUserBuilder::new(100)
        .first_name("Augusta")
        .last_name("King")
        .username("ada")
        .build();

    assert!(bot.simulate_text(&store, &first, "/start").await.unwrap());
    assert!(bot.simulate_text(&store, &renamed, "/start").await.unwrap());

    let users = store.users();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0], renamed);

    let replies = bot.get_messages_for_chat(100);
    assert_eq!(replies.len(), 2);
    assert!(replies.iter().all(|msg| msg.text == WELCOME_MESSAGE));

    // /start is not logged as a message
    assert!(store.messages().is_empty());
}

#[tokio::test]
async fn test_text_is_echoed_and_logged() {
    let store = MemoryStore::new();
    let bot = MockTelegramBot::new();
    let user = TestUserBuilder::new(200).first_name("Grace").build();

    bot.simulate_text(&store, &user, "what is a monad?")
        .await
        .expect("text handling should succeed");

    let replies = bot.get_messages_for_chat(200);
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].text, "You said: what is a monad?");

    let messages = store.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].user_id, 200);
    assert_eq!(messages[0].message_text, "what is a monad?");
    assert_eq!(messages[0].response_text, "You said: what is a monad?");

    assert_eq!(store.users(), vec![user]);
}

#[tokio::test]
async fn test_repeated_text_upserts_and_appends() {
    let store = MemoryStore::new();
    let bot = MockTelegramBot::new();

    let before = TestUserBuilder::new(300).first_name("Linus").build();
    let after = TestUserBuilder::new(300)
        .first_name("Linus")
        .username("torvalds")
        .build();

    bot.simulate_text(&store, &before, "one").await.unwrap();
    bot.simulate_text(&store, &after, "two").await.unwrap();

    assert_eq!(store.users(), vec![after]);

    let texts: Vec<String> = store
        .messages()
        .into_iter()
        .map(|m| m.message_text)
        .collect();
    assert_eq!(texts, vec!["one".to_string(), "two".to_string()]);
}

#[tokio::test]
async fn test_unknown_command_is_echoed() {
    let store = MemoryStore::new();
    let bot = MockTelegramBot::new();
    let user = TestUserBuilder::new(400).build();

    bot.simulate_text(&store, &user, "/quiz").await.unwrap();

    assert!(bot.chat_received_message_containing(400, "You said: /quiz"));
    assert_eq!(store.messages().len(), 1);
}

#[tokio::test]
async fn test_command_addressed_to_another_bot_is_echoed() {
    let store = MemoryStore::new();
    let bot = MockTelegramBot::new();
    let user = TestUserBuilder::new(450).build();

    bot.simulate_text(&store, &user, "/getdata@otherbot").await.unwrap();
    bot.simulate_text(&store, &user, &format!("/getdata@{}", BOT_USERNAME))
        .await
        .unwrap();

    let replies = bot.get_messages_for_chat(450);
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0].text, "You said: /getdata@otherbot");
    assert!(replies[1].text.starts_with("Database Results: "));
    assert_eq!(store.messages().len(), 1);
}

#[tokio::test]
async fn test_getdata_with_no_users_replies_empty_array() {
    let store = MemoryStore::new();
    let bot = MockTelegramBot::new();
    let user = TestUserBuilder::new(500).build();

    bot.simulate_text(&store, &user, "/getdata").await.unwrap();

    let replies = bot.get_messages_for_chat(500);
    assert_eq!(replies.len(), 1);
    assert!(replies[0].text.contains("[]"));
    assert_eq!(replies[0].text, "Database Results: []");

    // /getdata never upserts the caller
    assert!(store.users().is_empty());
}

#[tokio::test]
async fn test_getdata_lists_stored_users() {
    let store = MemoryStore::new();
    let bot = MockTelegramBot::new();
    let user = TestUserBuilder::new(600)
        .first_name("Barbara")
        .username("liskov")
        .build();

    bot.simulate_text(&store, &user, "/start").await.unwrap();
    bot.simulate_text(&store, &user, "/getdata").await.unwrap();

    let replies = bot.get_messages_for_chat(600);
    let dump = replies.last().expect("getdata reply").text.clone();
    let json = dump
        .strip_prefix("Database Results: ")
        .expect("reply should carry the results prefix");

    let rows: Vec<serde_json::Value> = serde_json::from_str(json).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["telegram_id"], 600);
    assert_eq!(rows[0]["username"], "liskov");
}

#[tokio::test]
async fn test_getdata_failure_replies_fixed_error() {
    let store = FailingStore;
    let bot = MockTelegramBot::new();
    let user = TestUserBuilder::new(700).build();

    let handled = bot
        .simulate_text(&store, &user, "/getdata")
        .await
        .expect("getdata recovers from store failures");

    assert!(handled);
    assert_eq!(bot.get_messages_for_chat(700)[0].text, GET_DATA_ERROR);
}

#[tokio::test]
async fn test_start_failure_is_reported_and_silent() {
    let store = FailingStore;
    let bot = MockTelegramBot::new();
    let user = TestUserBuilder::new(800).build();

    let err = bot
        .simulate_text(&store, &user, "/start")
        .await
        .expect_err("start should surface the store failure");

    assert_eq!(err.kind, EventKind::Start);
    assert_eq!(err.telegram_id, Some(800));
    assert!(bot.get_sent_messages().is_empty());
}

#[tokio::test]
async fn test_text_failure_is_reported_and_silent() {
    let store = FailingStore;
    let bot = MockTelegramBot::new();
    let user = TestUserBuilder::new(900).build();

    let err = bot
        .simulate_text(&store, &user, "hello?")
        .await
        .expect_err("text should surface the store failure");

    assert_eq!(err.kind, EventKind::Text);
    assert!(err.to_string().contains("text handler failed"));
    assert!(bot.get_sent_messages().is_empty());
}

#[tokio::test]
async fn test_messages_without_sender_or_text_are_ignored() {
    let store = MemoryStore::new();
    let bot = MockTelegramBot::new();
    let user = TestUserBuilder::new(1000).build();

    assert!(!bot.simulate_message(&store, None, Some("hi")).await.unwrap());
    assert!(!bot.simulate_message(&store, Some(&user), None).await.unwrap());

    assert!(bot.get_sent_messages().is_empty());
    assert!(store.users().is_empty());
}

#[tokio::test]
async fn test_large_getdata_dump_is_chunked() {
    let store = MemoryStore::new();
    let bot = MockTelegramBot::new();

    for id in 1..=200 {
        let user = TestUserBuilder::new(id)
            .first_name(&format!("Student number {}", id))
            .username(&format!("student_{}", id))
            .build();
        bot.simulate_text(&store, &user, "/start").await.unwrap();
    }

    let caller = TestUserBuilder::new(1).build();
    let before = bot.get_sent_messages().len();
    bot.simulate_text(&store, &caller, "/getdata").await.unwrap();

    let chunks: Vec<String> = bot.get_sent_messages()[before..]
        .iter()
        .map(|msg| msg.text.clone())
        .collect();

    assert!(chunks.len() > 1, "expected the dump to span several messages");
    for chunk in &chunks {
        assert!(MessageFormatter::count_utf16_code_units(chunk) <= MAX_MESSAGE_LENGTH);
    }

    let joined = chunks.concat();
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(joined.strip_prefix("Database Results: ").unwrap()).unwrap();
    assert_eq!(rows.len(), 200);
}

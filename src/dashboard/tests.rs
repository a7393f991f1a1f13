use super::*;
use crate::assistant::GREETING;

#[test]
fn new_session_starts_with_greeting() {
    let session = Session::new();
    assert_eq!(session.conversation.len(), 1);
    assert_eq!(session.conversation[0].role, ChatRole::Assistant);
    assert_eq!(session.conversation[0].content, GREETING);
    assert_eq!(session.refresh_ticks, 0);
}

#[test]
fn transcript_preserves_turn_order() {
    let mut session = Session::new();
    session.record_user("What happens during a DC fault?");
    session.record_assistant("The bus voltage collapses.");
    session.record_user("How fast?");

    let roles: Vec<ChatRole> = session
        .conversation
        .iter()
        .map(|message| message.role)
        .collect();
    assert_eq!(
        roles,
        vec![
            ChatRole::Assistant,
            ChatRole::User,
            ChatRole::Assistant,
            ChatRole::User,
        ]
    );
}

#[test]
fn failed_turns_are_part_of_the_transcript() {
    // The user-visible transcript must reflect failures, so an error
    // notice is recorded exactly like a normal assistant reply
    let mut session = Session::new();
    session.record_user("question");
    session.record_assistant("🚨 Interrupted, backend error: Chat service error: quota");

    assert!(
        session
            .conversation
            .last()
            .is_some_and(|m| m.content.contains("backend error"))
    );
}

//! Static documentation resources.
//!
//! Read-only guidance for the calling LLM: what each Pearl tier does and
//! how to drive the tools across a multi-turn conversation.

use crate::mcp::types::ResourceDefinition;

const MODES_URI: &str = "pearl://modes";
const GUIDELINES_URI: &str = "pearl://llm-guidelines";
const SECOND_OPINION_URI: &str = "pearl://second-opinion";

const MODES_JSON: &str = r#"{
  "pearl-ai": "Get help from advanced Pearl AI Assistant. Provides a quick AI-only response without human review.",
  "pearl-ai-expert": "Start conversation with advanced Pearl AI Assistant and transition to a human expert",
  "expert": "Direct connection to a human expert"
}"#;

const GUIDELINES: &str = r#"# Complete Guidelines for Using Pearl API Tools

## Communication Modes Overview

1. **AI-only ("pearl-ai")**: Quick, AI-generated answers using Pearl's knowledge base
2. **AI with expert transition ("pearl-ai-expert")**: Starts with AI intake questions, transitions to expert
3. **Direct expert ("expert")**: Immediate routing to a qualified human expert

## When To Use Different Tools

1. **Human Expert Access (`ask_expert`)**
- Use when the user explicitly asks to speak with a real human expert
- Best for complex topics where LLM has lower confidence: Medical, Legal, Tax, etc.
- Appropriate when personalized advice is needed for specific situations
- Immediately connects user to a qualified human expert without AI intermediary
- Example triggers: "Can I talk to a real expert?", "I'd like to speak with a human"

2. **AI with Expert Transition (`ask_pearl_expert`)**
- Use for complex issues that require clarification before expert involvement
- AI handles intake questions to gather necessary context and details
- Then transitions to a human expert who reviews the gathered information
- Good for technical problems that need detailed diagnosis
- Efficient for queries where initial AI screening improves human expert efficiency
- Example use cases: Technical troubleshooting, product recommendations that need specifics

3. **Second Opinions (`ask_pearl_ai`)**
- Use when the user asks for another opinion or alternative view
- Provides a quick AI-only response without human review
- Good for non-critical situations where diverse perspectives are helpful
- Useful when user is comparing different approaches or solutions
- Example triggers: "What's another perspective?", "Can I get a second opinion?"

## Conversation Management

### Passing Conversation History

1. **FIRST TIME calling a tool**
- Always pass the full conversation history using the `chat_history` parameter
- For expert tools (`ask_expert` and `ask_pearl_expert`), the system automatically combines the entire history into a single formatted question for the expert
- This ensures experts see the complete context in a readable format

2. **FOLLOW-UP calls to the same tool**
- Use just the `question` parameter with the latest user query
- Include the `session_id` from the previous response
- The expert system already has the history from the first call

### Presenting Expert Responses

- NEVER add your own commentary, clarifications, or additional information to expert responses
- Present the expert's answer exactly as received without modification
- Do not prefix, suffix or augment the expert's response with your own insights
- Do not attempt to "improve" or "expand upon" the expert's answer
- If an expert response seems incomplete, use follow-up questions to the same expert rather than filling gaps yourself

### Preserving Original Message Format

- ALWAYS preserve user messages in their original first-person format
- DO NOT rewrite in third person (e.g., "Customer says..." or "Customer owns...")
- Keep exact wording: "I own a Honda Civic..." not "Customer owns a Honda Civic..."

### Session Management

- All responses include a `session_id` that should be extracted and used for follow-ups
- Session IDs connect multiple interactions to maintain conversation context

## Example Usage

First call, including the full conversation history:

```json
{
  "question": "What should I do next?",
  "chat_history": [
    {"role": "user", "content": "I own a 2015 Honda Civic with 85,000 miles."},
    {"role": "assistant", "content": "Thanks for providing that information. What issues are you experiencing?"},
    {"role": "user", "content": "It's making a rattling noise when I accelerate."}
  ]
}
```

Follow-up call, with just the question and the session ID from the
previous response:

```json
{
  "question": "Would replacing the catalytic converter help?",
  "session_id": "sess_01J8X2K9QJ5M3N4P6R7S8T9V0W"
}
```

Remember: pass full history only on the first call, use session_id for
follow-ups, keep messages in their original format, and NEVER modify or
add to expert responses.
"#;

const SECOND_OPINION: &str = r#"# Second Opinion Handling Guide

## Trigger Phrases

The following phrases typically indicate that a user is requesting a second opinion, which should trigger use of the `ask_pearl_ai` tool:

### Direct Requests
- "Can I get a second opinion?"
- "I'd like another opinion"
- "What's your second opinion?"
- "Can I hear another perspective?"
- "Is there an alternative view?"
- "What does someone else think?"

### Subtle Requests
- "I'm not sure about that answer"
- "That doesn't sound right to me"
- "I think I need more opinions"
- "Is there another way to look at this?"
- "What would someone else say about this?"
- "Do you have a different take?"

### Context-Specific Phrases
- "What do other experts say about this?"
- "Are there other approaches I should consider?"
- "What are the alternative explanations?"
- "I've heard differently from others"
- "My friend told me something different"

## Example Conversation Flow

**User**: I've been getting headaches when I work on my computer for long hours. What could be causing this?

**Assistant**: [lists possible causes: eye strain, posture, dehydration, lighting, screen brightness]

**User**: Can I get a second opinion on this?

The assistant should recognize this as a request for an alternative perspective and call `ask_pearl_ai` with the focused question and the full conversation so far as `chat_history`, then present the response as an alternative perspective.

## Best Practices
1. When detecting a second opinion request, use `ask_pearl_ai` (not expert tools)
2. Pass full conversation history on first call only
3. Focus the question on the core issue being discussed
4. Present the response as an alternative perspective
"#;

/// Returns the definitions of all resources.
#[must_use]
pub fn definitions() -> Vec<ResourceDefinition> {
    vec![
        ResourceDefinition {
            uri: MODES_URI.to_string(),
            name: "Pearl communication modes".to_string(),
            description: "Information about Pearl API communication modes".to_string(),
            mime_type: "application/json".to_string(),
        },
        ResourceDefinition {
            uri: GUIDELINES_URI.to_string(),
            name: "Pearl tool guidelines".to_string(),
            description: "Comprehensive guidelines for an LLM on how to interact with Pearl API tools"
                .to_string(),
            mime_type: "text/markdown".to_string(),
        },
        ResourceDefinition {
            uri: SECOND_OPINION_URI.to_string(),
            name: "Second opinion handling".to_string(),
            description: "Example scenario showing how to handle second opinion requests"
                .to_string(),
            mime_type: "text/markdown".to_string(),
        },
    ]
}

/// Reads a resource by URI. Returns the mime type and content.
#[must_use]
pub fn read(uri: &str) -> Option<(&'static str, &'static str)> {
    match uri {
        MODES_URI => Some(("application/json", MODES_JSON)),
        GUIDELINES_URI => Some(("text/markdown", GUIDELINES)),
        SECOND_OPINION_URI => Some(("text/markdown", SECOND_OPINION)),
        _ => None,
    }
}

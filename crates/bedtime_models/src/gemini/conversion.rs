//! Conversions between bedtime request/response types and Gemini wire types.

use super::dto::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData, Part,
    PrebuiltVoice, SpeechConfig, VoiceSelection,
};
use super::wav;
use base64::{Engine, engine::general_purpose::STANDARD};
use bedtime_core::{
    AudioEncoding, GenerateRequest, GenerateResponse, Input, Modality, Output, ResponseFormat,
};
use bedtime_error::{GenerationError, GenerationErrorKind};

/// Finish reasons that mean the candidate was withheld.
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
    "IMAGE_SAFETY",
];

/// Build the `generateContent` body for a request.
pub fn to_gemini_request(
    req: &GenerateRequest,
) -> Result<GenerateContentRequest, GenerationError> {
    let parts: Vec<Part> = req.inputs().iter().map(to_part).collect();
    if parts.is_empty() {
        return Err(GenerationError::new(GenerationErrorKind::Unsupported(
            "request has no inputs".to_string(),
        )));
    }

    let has_image = req
        .inputs()
        .iter()
        .any(|input| matches!(input, Input::Image { .. }));
    if *req.modality() == Modality::VisionToText && !has_image {
        return Err(GenerationError::new(GenerationErrorKind::Unsupported(
            "vision-to-text request carries no image".to_string(),
        )));
    }

    let mut config = GenerationConfig {
        temperature: *req.temperature(),
        max_output_tokens: *req.max_tokens(),
        ..Default::default()
    };

    match req.modality() {
        Modality::Text | Modality::VisionToText => {
            if *req.response_format() == ResponseFormat::Json {
                config.response_mime_type = Some("application/json".to_string());
            }
        }
        Modality::TextToImage => {
            config.response_modalities = Some(vec!["TEXT".to_string(), "IMAGE".to_string()]);
        }
        Modality::TextToSpeech => {
            let voice = req.voice().clone().unwrap_or_default();
            config.response_modalities = Some(vec!["AUDIO".to_string()]);
            config.speech_config = Some(SpeechConfig {
                voice_config: VoiceSelection {
                    prebuilt_voice_config: PrebuiltVoice {
                        voice_name: voice.voice_name,
                    },
                },
                language_code: Some(voice.language_code),
            });
        }
    }

    let generation_config = (config != GenerationConfig::default()).then_some(config);

    Ok(GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        generation_config,
    })
}

fn to_part(input: &Input) -> Part {
    match input {
        Input::Text(text) => Part {
            text: Some(text.clone()),
            ..Default::default()
        },
        Input::Image { mime, data } => Part {
            inline_data: Some(InlineData {
                mime_type: mime.clone(),
                data: STANDARD.encode(data),
            }),
            ..Default::default()
        },
    }
}

/// Convert a `generateContent` response into outputs for the requested modality.
///
/// Raw PCM audio is wrapped as WAV when the request asked for WAV.
pub fn from_gemini_response(
    response: GenerateContentResponse,
    req: &GenerateRequest,
) -> Result<GenerateResponse, GenerationError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.clone())
    {
        return Err(GenerationError::new(GenerationErrorKind::Blocked(reason)));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(GenerationError::new(GenerationErrorKind::EmptyOutput(
            "candidate".to_string(),
        )));
    };

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    if parts.is_empty()
        && let Some(reason) = candidate.finish_reason.as_deref()
        && BLOCKING_FINISH_REASONS.contains(&reason)
    {
        return Err(GenerationError::new(GenerationErrorKind::Blocked(
            reason.to_string(),
        )));
    }

    let encoding = req.voice().as_ref().map(|v| v.encoding).unwrap_or_default();
    let mut outputs = Vec::with_capacity(parts.len());
    for part in parts {
        if part.thought == Some(true) {
            continue;
        }
        if let Some(text) = part.text {
            outputs.push(Output::Text(text));
        }
        if let Some(inline) = part.inline_data {
            outputs.push(decode_inline(inline, encoding)?);
        }
    }

    let response = GenerateResponse { outputs };
    ensure_modality_output(&response, *req.modality())?;
    Ok(response)
}

fn decode_inline(inline: InlineData, encoding: AudioEncoding) -> Result<Output, GenerationError> {
    let data = STANDARD
        .decode(inline.data.as_bytes())
        .map_err(|e| GenerationError::new(GenerationErrorKind::Base64Decode(e.to_string())))?;
    let mime = inline.mime_type;

    if mime.starts_with("audio/") {
        if wav::is_raw_pcm(&mime) && encoding == AudioEncoding::Wav {
            let rate = wav::sample_rate(&mime);
            return Ok(Output::Audio {
                mime: AudioEncoding::Wav.mime_type().to_string(),
                data: wav::wrap_pcm(&data, rate),
            });
        }
        return Ok(Output::Audio { mime, data });
    }

    Ok(Output::Image { mime, data })
}

fn ensure_modality_output(
    response: &GenerateResponse,
    modality: Modality,
) -> Result<(), GenerationError> {
    let missing = match modality {
        Modality::Text | Modality::VisionToText => response
            .text()
            .is_none_or(|text| text.trim().is_empty())
            .then_some("text"),
        Modality::TextToImage => response.image().is_none().then_some("image"),
        Modality::TextToSpeech => response
            .audio()
            .is_none_or(|(_, data)| data.is_empty())
            .then_some("audio"),
    };
    match missing {
        Some(what) => Err(GenerationError::new(GenerationErrorKind::EmptyOutput(
            what.to_string(),
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bedtime_core::VoiceConfig;

    fn request(modality: Modality, inputs: Vec<Input>) -> GenerateRequest {
        GenerateRequest::builder()
            .modality(modality)
            .inputs(inputs)
            .build()
            .unwrap()
    }

    fn response_json(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn vision_request_inlines_base64_image() {
        let req = request(
            Modality::VisionToText,
            vec![
                Input::Text("describe".to_string()),
                Input::Image {
                    mime: "image/png".to_string(),
                    data: vec![1, 2, 3],
                },
            ],
        );
        let body = serde_json::to_value(to_gemini_request(&req).unwrap()).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "describe");
        assert_eq!(
            body["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/png"
        );
        assert_eq!(body["contents"][0]["parts"][1]["inlineData"]["data"], "AQID");
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn vision_request_without_image_is_rejected() {
        let req = request(Modality::VisionToText, vec![Input::Text("x".to_string())]);
        let err = to_gemini_request(&req).unwrap_err();
        assert!(matches!(err.kind, GenerationErrorKind::Unsupported(_)));
    }

    #[test]
    fn json_mode_sets_response_mime_type() {
        let req = GenerateRequest::builder()
            .modality(Modality::Text)
            .inputs(vec![Input::Text("story".to_string())])
            .response_format(ResponseFormat::Json)
            .build()
            .unwrap();
        let body = serde_json::to_value(to_gemini_request(&req).unwrap()).unwrap();
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn image_request_asks_for_image_modality() {
        let req = request(Modality::TextToImage, vec![Input::Text("a fox".to_string())]);
        let body = serde_json::to_value(to_gemini_request(&req).unwrap()).unwrap();
        assert_eq!(
            body["generationConfig"]["responseModalities"],
            serde_json::json!(["TEXT", "IMAGE"])
        );
    }

    #[test]
    fn speech_request_names_voice() {
        let req = GenerateRequest::builder()
            .modality(Modality::TextToSpeech)
            .inputs(vec![Input::Text("Once upon a time".to_string())])
            .voice(Some(VoiceConfig {
                voice_name: "Kore".to_string(),
                ..Default::default()
            }))
            .build()
            .unwrap();
        let body = serde_json::to_value(to_gemini_request(&req).unwrap()).unwrap();
        let speech = &body["generationConfig"]["speechConfig"];

        assert_eq!(
            body["generationConfig"]["responseModalities"],
            serde_json::json!(["AUDIO"])
        );
        assert_eq!(speech["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"], "Kore");
        assert_eq!(speech["languageCode"], "en-US");
    }

    #[test]
    fn text_parts_are_collected_and_thoughts_skipped() {
        let req = request(Modality::Text, vec![Input::Text("hi".to_string())]);
        let resp = response_json(serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "thinking...", "thought": true},
                    {"text": "Hello"},
                    {"text": " there"}
                ]},
                "finishReason": "STOP"
            }]
        }));
        let out = from_gemini_response(resp, &req).unwrap();
        assert_eq!(out.text().as_deref(), Some("Hello there"));
    }

    #[test]
    fn image_part_is_decoded() {
        let req = request(Modality::TextToImage, vec![Input::Text("fox".to_string())]);
        let resp = response_json(serde_json::json!({
            "candidates": [{"content": {"parts": [
                {"text": "Here is your fox"},
                {"inlineData": {"mimeType": "image/png", "data": "iVBORw=="}}
            ]}}]
        }));
        let out = from_gemini_response(resp, &req).unwrap();
        let (mime, data) = out.image().unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(data, &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn pcm_audio_is_wrapped_as_wav() {
        let req = request(Modality::TextToSpeech, vec![Input::Text("hi".to_string())]);
        let resp = response_json(serde_json::json!({
            "candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "audio/L16;codec=pcm;rate=24000", "data": "AAAAAA=="}}
            ]}}]
        }));
        let out = from_gemini_response(resp, &req).unwrap();
        let (mime, data) = out.audio().unwrap();
        assert_eq!(mime, "audio/wav");
        assert_eq!(data.len(), 44 + 4);
        assert_eq!(&data[0..4], b"RIFF");
    }

    #[test]
    fn pcm_encoding_keeps_raw_samples() {
        let req = GenerateRequest::builder()
            .modality(Modality::TextToSpeech)
            .inputs(vec![Input::Text("hi".to_string())])
            .voice(Some(VoiceConfig {
                encoding: AudioEncoding::Pcm,
                ..Default::default()
            }))
            .build()
            .unwrap();
        let resp = response_json(serde_json::json!({
            "candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "audio/L16;rate=24000", "data": "AAAAAA=="}}
            ]}}]
        }));
        let out = from_gemini_response(resp, &req).unwrap();
        let (mime, data) = out.audio().unwrap();
        assert!(mime.starts_with("audio/L16"));
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn prompt_block_is_reported() {
        let req = request(Modality::Text, vec![Input::Text("hi".to_string())]);
        let resp = response_json(serde_json::json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }));
        let err = from_gemini_response(resp, &req).unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::Blocked("SAFETY".to_string()));
    }

    #[test]
    fn safety_finish_without_parts_is_blocked() {
        let req = request(Modality::TextToImage, vec![Input::Text("x".to_string())]);
        let resp = response_json(serde_json::json!({
            "candidates": [{"finishReason": "IMAGE_SAFETY"}]
        }));
        let err = from_gemini_response(resp, &req).unwrap_err();
        assert!(matches!(err.kind, GenerationErrorKind::Blocked(_)));
    }

    #[test]
    fn missing_image_is_empty_output() {
        let req = request(Modality::TextToImage, vec![Input::Text("x".to_string())]);
        let resp = response_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "I can't draw that"}]}}]
        }));
        let err = from_gemini_response(resp, &req).unwrap_err();
        assert_eq!(
            err.kind,
            GenerationErrorKind::EmptyOutput("image".to_string())
        );
    }
}

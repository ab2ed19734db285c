use std::path::Path;

use crate::constants::TEXT_EXTENSION;
use crate::errors::Result;
use crate::fs_utils::{file_key, has_extension, list_dir_files, read_text_file};
use crate::models::PromptEntry;

/// Reads every `*.txt` file in `dir` in filename order, one prompt per file.
///
/// Text is trimmed. A file that cannot be read fails the whole call; a
/// directory with no prompt files yields an empty list.
pub async fn read_prompts_from_dir(dir: &Path) -> Result<Vec<PromptEntry>> {
    let mut prompts = Vec::new();

    for path in list_dir_files(dir).await? {
        if !has_extension(&path, TEXT_EXTENSION) {
            continue;
        }
        let Some(key) = file_key(&path) else {
            tracing::warn!(path = %path.display(), "skipping prompt file with a non UTF-8 name");
            continue;
        };

        let text = read_text_file(&path).await?;
        prompts.push(PromptEntry {
            key,
            text: text.trim().to_string(),
        });
    }

    Ok(prompts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn only_txt_files_are_prompts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.md"), "no").unwrap();
        std::fs::write(dir.path().join("image.png"), [0u8, 1, 2]).unwrap();

        let prompts = read_prompts_from_dir(dir.path()).await.unwrap();
        assert!(prompts.is_empty());
    }

    #[tokio::test]
    async fn prompts_are_trimmed_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "  a red chair \n").unwrap();
        std::fs::write(dir.path().join("a.txt"), "a wooden table").unwrap();

        let prompts = read_prompts_from_dir(dir.path()).await.unwrap();
        assert_eq!(
            prompts,
            vec![
                PromptEntry {
                    key: "a".into(),
                    text: "a wooden table".into()
                },
                PromptEntry {
                    key: "b".into(),
                    text: "a red chair".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn latin1_prompt_is_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = b"  caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b" chair\n");
        std::fs::write(dir.path().join("latin.txt"), bytes).unwrap();

        let prompts = read_prompts_from_dir(dir.path()).await.unwrap();
        assert_eq!(prompts[0].text, "café chair");
    }
}

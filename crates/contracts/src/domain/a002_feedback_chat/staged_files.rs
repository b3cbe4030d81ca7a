use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Файл, выбранный пользователем, но ещё не отправленный
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedFile {
    pub id: Uuid,
    pub name: String,
    pub size_bytes: u64,
}

impl StagedFile {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            size_bytes,
        }
    }

    /// Тот же файл: совпадает id либо имя и размер
    pub fn is_same_file(&self, other: &StagedFile) -> bool {
        self.id == other.id || (self.name == other.name && self.size_bytes == other.size_bytes)
    }
}

/// Набор файлов для следующей отправки, в порядке выбора
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StagedFiles {
    files: Vec<StagedFile>,
}

impl StagedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Повторный выбор того же файла игнорируется; `false`, если файл уже в наборе
    pub fn stage(&mut self, file: StagedFile) -> bool {
        if self.files.iter().any(|f| f.is_same_file(&file)) {
            return false;
        }
        self.files.push(file);
        true
    }

    pub fn remove(&mut self, id: Uuid) -> Option<StagedFile> {
        let pos = self.files.iter().position(|f| f.id == id)?;
        Some(self.files.remove(pos))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Забрать все файлы, оставив набор пустым
    pub fn take(&mut self) -> Vec<StagedFile> {
        std::mem::take(&mut self.files)
    }

    pub fn names(&self) -> Vec<String> {
        self.files.iter().map(|f| f.name.clone()).collect()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size_bytes).sum()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StagedFile> {
        self.files.iter()
    }
}

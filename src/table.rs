//! Клиентская пагинация и текстовый фильтр для табличных экранов.

/// Одна страница списка.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn page_count(&self) -> u32 {
        if self.total == 0 {
            return 1;
        }
        self.total.div_ceil(self.page_size as usize) as u32
    }
}

/// page начинается с 1, page_size ограничен 1..=100 (как у серверных списков).
pub fn paginate<T: Clone>(items: &[T], page: u32, page_size: u32) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.clamp(1, 100);
    let offset = (page - 1) as usize * page_size as usize;
    let slice = items
        .iter()
        .skip(offset)
        .take(page_size as usize)
        .cloned()
        .collect();
    Page {
        items: slice,
        page,
        page_size,
        total: items.len(),
    }
}

/// Регистронезависимый поиск по нескольким полям записи.
pub fn matches_query(haystacks: &[&str], query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    haystacks
        .iter()
        .any(|h| h.to_lowercase().contains(&query))
}

//! Highlight colors

/// One entry of the palette. `value: None` is the "no color" entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorChoice {
    pub name: &'static str,
    pub value: Option<&'static str>,
}

const DEFAULT_COLORS: [ColorChoice; 9] = [
    ColorChoice { name: "Красный", value: Some("#FFCDD2") },
    ColorChoice { name: "Розовый", value: Some("#F8BBD0") },
    ColorChoice { name: "Фиолетовый", value: Some("#E1BEE7") },
    ColorChoice { name: "Синий", value: Some("#BBDEFB") },
    ColorChoice { name: "Зеленый", value: Some("#C8E6C9") },
    ColorChoice { name: "Желтый", value: Some("#FFF9C4") },
    ColorChoice { name: "Оранжевый", value: Some("#FFE0B2") },
    ColorChoice { name: "Серый", value: Some("#EEEEEE") },
    ColorChoice { name: "Нет", value: None },
];

/// Ordered, fixed list of highlight colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: &'static [ColorChoice],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: &DEFAULT_COLORS,
        }
    }
}

impl Palette {
    pub fn get(&self, index: usize) -> Option<&ColorChoice> {
        self.colors.get(index)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorChoice> {
        self.colors.iter()
    }

    /// Index of the entry with this color value, ignoring case.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.colors
            .iter()
            .position(|c| c.value.is_some_and(|v| v.eq_ignore_ascii_case(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_entry_is_no_color() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 9);
        assert_eq!(palette.get(8).and_then(|c| c.value), None);
        assert_eq!(palette.index_of("#bbdefb"), Some(3));
        assert!(palette.get(9).is_none());
    }
}

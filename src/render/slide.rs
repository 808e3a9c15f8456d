use crate::error::{Error, ErrorType, Result};
use crate::logging::log_debug;
use crate::render::wrap::wrap_lines;
use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;

/// Шрифт по умолчанию
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

/// Текст финального слайда с призывом подписаться
pub const OUTRO_TEXT: &str = "¡SUSCRÍBETE AL CANAL!\nDale like y activa la campana";

/// Размер шрифта финального слайда
pub const OUTRO_FONT_SIZE: f32 = 40.0;

/// Оформление слайда
#[derive(Debug, Clone, PartialEq)]
pub struct SlideStyle {
    pub width: u32,
    pub height: u32,
    pub font_size: f32,
    pub line_height: u32,
    /// Суммарный горизонтальный отступ; строки переносятся при ширине больше `width - margin`
    pub margin: u32,
    pub background: [u8; 3],
    pub foreground: [u8; 3],
}

impl Default for SlideStyle {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 360,
            font_size: 30.0,
            line_height: 40,
            margin: 60,
            background: [0, 0, 0],
            foreground: [255, 255, 255],
        }
    }
}

impl SlideStyle {
    /// Стиль финального слайда: тот же холст, шрифт крупнее
    pub fn outro(&self) -> Self {
        Self {
            font_size: OUTRO_FONT_SIZE,
            ..self.clone()
        }
    }

    /// Максимальная ширина строки
    pub fn max_line_width(&self) -> u32 {
        self.width.saturating_sub(self.margin)
    }

    /// Вертикальная позиция первой строки блока из `lines` строк
    pub fn first_line_y(&self, lines: usize) -> i32 {
        let total_height = lines as i64 * self.line_height as i64;
        ((self.height as i64 - total_height) / 2) as i32
    }
}

/// Отрисовщик текстовых слайдов
pub struct SlideRenderer {
    font: FontVec,
}

impl SlideRenderer {
    /// Загружает TrueType шрифт из файла
    pub fn from_font_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            Error::new(
                ErrorType::Rendering,
                &format!("Не удалось прочитать шрифт {}: {}", path.display(), e),
            )
        })?;
        Self::from_font_bytes(bytes)
    }

    /// Создает отрисовщик из байтов шрифта
    pub fn from_font_bytes(bytes: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| Error::new(ErrorType::Rendering, &format!("Некорректный шрифт: {}", e)))?;
        Ok(Self { font })
    }

    /// Ширина строки в пикселях
    pub fn measure(&self, text: &str, font_size: f32) -> u32 {
        text_size(PxScale::from(font_size), &self.font, text).0
    }

    /// Разбивает текст на строки для заданного стиля
    pub fn layout(&self, text: &str, style: &SlideStyle) -> Vec<String> {
        wrap_lines(text, style.max_line_width(), |line| self.measure(line, style.font_size))
    }

    /// Рисует слайд: строки по центру по горизонтали, блок по центру по вертикали
    pub fn render(&self, text: &str, style: &SlideStyle) -> RgbImage {
        let mut image = RgbImage::from_pixel(style.width, style.height, Rgb(style.background));
        let scale = PxScale::from(style.font_size);
        let lines = self.layout(text, style);

        let mut y = style.first_line_y(lines.len());
        for line in &lines {
            let line_width = self.measure(line, style.font_size) as i64;
            let x = ((style.width as i64 - line_width) / 2) as i32;
            draw_text_mut(&mut image, Rgb(style.foreground), x, y, scale, &self.font, line);
            y += style.line_height as i32;
        }

        log_debug(&format!("Отрисован слайд: {} строк", lines.len()));
        image
    }

    /// Рисует слайд и сохраняет его в PNG
    pub fn render_to_file<P: AsRef<Path>>(&self, text: &str, style: &SlideStyle, path: P) -> Result<()> {
        let path = path.as_ref();
        self.render(text, style).save(path).map_err(|e| {
            Error::new(
                ErrorType::Rendering,
                &format!("Не удалось сохранить слайд {}: {}", path.display(), e),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style() {
        let style = SlideStyle::default();
        assert_eq!((style.width, style.height), (1280, 360));
        assert_eq!(style.max_line_width(), 1220);
    }

    #[test]
    fn test_outro_style_keeps_canvas() {
        let outro = SlideStyle::default().outro();
        assert_eq!(outro.font_size, 40.0);
        assert_eq!(outro.width, 1280);
        assert_eq!(outro.line_height, 40);
    }

    #[test]
    fn test_vertical_centering() {
        let style = SlideStyle::default();
        assert_eq!(style.first_line_y(1), 160);
        assert_eq!(style.first_line_y(3), 120);
        // блок выше холста уходит за верхний край
        assert_eq!(style.first_line_y(10), -20);
    }

    #[test]
    fn test_invalid_font_bytes() {
        assert!(SlideRenderer::from_font_bytes(vec![0u8; 16]).is_err());
    }

    #[test]
    fn test_missing_font_file() {
        assert!(SlideRenderer::from_font_file("/nonexistent/font.ttf").is_err());
    }
}

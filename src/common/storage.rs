// Derivação de URL pública para imagens do cardápio.
// O upload em si acontece fora deste serviço; aqui só montamos a URL.

const MENU_IMAGES_BUCKET: &str = "menu_images";

/// Monta a URL pública de uma imagem a partir do caminho relativo armazenado.
/// Retorna `None` quando o item não tem imagem.
pub fn menu_image_url(storage_public_url: &str, path: Option<&str>) -> Option<String> {
    let path = path?;
    let base = storage_public_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Some(format!("{base}/{MENU_IMAGES_BUCKET}/{path}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monta_url_publica() {
        let url = menu_image_url("https://storage.pedeja.app/", Some("lanches/x-burger.png"));
        assert_eq!(
            url.as_deref(),
            Some("https://storage.pedeja.app/menu_images/lanches/x-burger.png")
        );
    }

    #[test]
    fn sem_imagem_retorna_none() {
        assert_eq!(menu_image_url("https://storage.pedeja.app", None), None);
    }

    #[test]
    fn normaliza_barras_duplicadas() {
        let url = menu_image_url("https://storage.pedeja.app", Some("/pizzas/marguerita.png"));
        assert_eq!(
            url.as_deref(),
            Some("https://storage.pedeja.app/menu_images/pizzas/marguerita.png")
        );
    }
}

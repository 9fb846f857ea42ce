use anyhow::Result;

use crate::app::App;

pub async fn generate(app: &App, text: &str) -> Result<()> {
    let code = app.generator.generate(text).await?;
    let options = app.generator.options();

    println!("QR code generated");
    println!("  Content:  {}", code.content());
    println!("  Id:       {}", code.record.id);
    println!(
        "  Image:    {} ({}px, {:?} error correction)",
        code.download_file_name, options.size, options.error_correction
    );
    println!("  Share:    {}", code.share_link);
    Ok(())
}

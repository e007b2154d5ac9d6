// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Embeddable script rendering.
//!
//! Scripts are generated per request, parameterized by the verified account
//! id and the server's own base URL. Values are embedded as JSON literals so
//! account ids and asset names can never break out of the script context.

use alcove_server_db::Asset;

/// Render the chat widget bootstrap script.
///
/// The script degrades gracefully: any failed API call renders an error
/// message inside the chat window instead of throwing into the host page.
pub fn render_widget_script(account_id: &str, api_base_url: &str) -> String {
	let account_js = json_string(account_id);
	let base_url_js = json_string(api_base_url);

	format!(
		r#"(function () {{
  var accountId = {account_js};
  var apiBaseUrl = {base_url_js};

  var bubble = document.createElement('div');
  bubble.style.cssText = 'position:fixed;bottom:20px;right:20px;width:60px;height:60px;background:#1E90FF;color:white;font-size:28px;display:flex;align-items:center;justify-content:center;border-radius:50%;cursor:pointer;z-index:9999;box-shadow:0 4px 12px rgba(30,144,255,0.3);';
  bubble.textContent = '💬';
  document.body.appendChild(bubble);

  var chatWindow = document.createElement('div');
  chatWindow.style.cssText = 'display:none;position:fixed;bottom:90px;right:20px;width:320px;height:420px;background:white;border:1px solid #ccc;border-radius:10px;z-index:9999;flex-direction:column;box-shadow:0 0 20px rgba(0,0,0,0.15);overflow:hidden;font-family:-apple-system,BlinkMacSystemFont,sans-serif;';
  chatWindow.innerHTML =
    '<div style="padding:15px;background:#1E90FF;color:white;font-weight:600;display:flex;justify-content:space-between;">' +
    '<span>Alcove Assistant</span>' +
    '<span id="alcove-close" style="cursor:pointer;font-size:18px;">&times;</span>' +
    '</div>' +
    '<div id="alcove-messages" style="flex:1;padding:15px;overflow-y:auto;background:#f8f9fa;"></div>' +
    '<div style="padding:10px;border-top:1px solid #eee;background:white;">' +
    '<input id="alcove-input" placeholder="Ask something..." style="width:100%;border:1px solid #ddd;border-radius:20px;padding:10px 15px;outline:none;font-size:14px;" />' +
    '</div>';
  document.body.appendChild(chatWindow);

  var isOpen = false;
  function toggleChat() {{
    isOpen = !isOpen;
    chatWindow.style.display = isOpen ? 'flex' : 'none';
    if (isOpen) document.getElementById('alcove-input').focus();
  }}
  bubble.onclick = toggleChat;
  chatWindow.querySelector('#alcove-close').onclick = toggleChat;

  var input = chatWindow.querySelector('#alcove-input');
  var messages = chatWindow.querySelector('#alcove-messages');

  function addMessage(sender, message, isError) {{
    var div = document.createElement('div');
    div.style.cssText = 'margin-bottom:12px;padding:8px 12px;border-radius:12px;max-width:85%;word-wrap:break-word;' +
      (sender === 'You'
        ? 'background:#1E90FF;color:white;margin-left:auto;text-align:right;'
        : 'background:white;border:1px solid #e0e0e0;' + (isError ? 'color:#d32f2f;border-color:#ffcdd2;' : ''));
    var label = document.createElement('div');
    label.style.cssText = 'font-size:12px;opacity:0.7;margin-bottom:2px;';
    label.textContent = sender;
    var body = document.createElement('div');
    body.textContent = message;
    div.appendChild(label);
    div.appendChild(body);
    messages.appendChild(div);
    messages.scrollTop = messages.scrollHeight;
  }}

  input.addEventListener('keypress', function (e) {{
    if (e.key !== 'Enter') return;
    var question = input.value.trim();
    if (!question) return;

    addMessage('You', question, false);
    input.value = '';
    input.disabled = true;

    fetch(apiBaseUrl + '/api/widget/query', {{
      method: 'POST',
      headers: {{ 'Content-Type': 'application/json' }},
      body: JSON.stringify({{ question: question, accountId: accountId }})
    }})
      .then(function (res) {{
        if (!res.ok) throw new Error('HTTP ' + res.status);
        return res.json();
      }})
      .then(function (data) {{
        addMessage('Alcove', data.answer || 'Sorry, I could not process your request.', false);
      }})
      .catch(function () {{
        addMessage('Alcove', 'Sorry, I am having trouble connecting right now. Please try again.', true);
      }})
      .then(function () {{
        input.disabled = false;
        input.focus();
      }});
  }});

  setTimeout(function () {{
    addMessage('Alcove', 'Hi! What can I help you with today?', false);
  }}, 500);
}})();
"#
	)
}

/// Render the image gallery script for an account's assets.
pub fn render_gallery_script(assets: &[Asset]) -> String {
	let entries: Vec<serde_json::Value> = assets
		.iter()
		.map(|a| serde_json::json!({ "url": a.url, "name": a.name }))
		.collect();
	let images_js =
		serde_json::to_string(&entries).unwrap_or_else(|_| "[]".to_string());

	format!(
		r#"(function () {{
  var images = {images_js};
  var container = document.getElementById('alcove-image-gallery');
  if (!container) return;

  container.style.display = 'grid';
  container.style.gridTemplateColumns = 'repeat(auto-fill, minmax(200px, 1fr))';
  container.style.gap = '16px';

  images.forEach(function (img) {{
    var wrapper = document.createElement('div');
    wrapper.style.cssText = 'border:1px solid #ccc;border-radius:8px;overflow:hidden;box-shadow:0 2px 6px rgba(0,0,0,0.1);background:#fff;';

    var image = document.createElement('img');
    image.src = img.url;
    image.alt = img.name || 'image';
    image.style.cssText = 'width:100%;display:block;';

    wrapper.appendChild(image);
    container.appendChild(wrapper);
  }});
}})();
"#
	)
}

/// Encode a value as a double-quoted JSON string literal for embedding in JS.
fn json_string(value: &str) -> String {
	serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::Utc;

	#[test]
	fn test_widget_script_embeds_parameters() {
		let script = render_widget_script("abc123", "https://widgets.alcove.test");
		assert!(script.contains("var accountId = \"abc123\";"));
		assert!(script.contains("var apiBaseUrl = \"https://widgets.alcove.test\";"));
	}

	#[test]
	fn test_widget_script_escapes_account_id() {
		let script = render_widget_script("ab\"c</script>", "http://localhost:8080");
		// The raw quote must not terminate the JS string literal.
		assert!(script.contains(r#"var accountId = "ab\"c</script>";"#));
	}

	#[test]
	fn test_gallery_script_embeds_assets() {
		let assets = vec![Asset {
			id: "a1".to_string(),
			account_id: "abc123".to_string(),
			url: "https://cdn.test/a.png".to_string(),
			name: Some("a.png".to_string()),
			uploaded_at: Utc::now(),
		}];
		let script = render_gallery_script(&assets);
		assert!(script.contains("https://cdn.test/a.png"));
		assert!(script.contains("a.png"));
	}

	#[test]
	fn test_gallery_script_with_no_assets() {
		let script = render_gallery_script(&[]);
		assert!(script.contains("var images = []"));
	}
}

//! The single page served at `/`.

pub const PAGE_HTML: &str = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>🎬 TubeLens — YouTube Video Analyzer</title>
<style>
  :root { --accent: #c4302b; --border: #ddd; }
  body { font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem; color: #222; }
  h1 { font-size: 2rem; }
  fieldset { border: 1px solid var(--border); border-radius: 8px; margin-bottom: 1rem; }
  label { display: block; margin: .5rem 0 .25rem; font-weight: 600; }
  input { width: 100%; box-sizing: border-box; padding: .5rem; border: 1px solid var(--border); border-radius: 6px; }
  button { background: var(--accent); color: #fff; border: 0; border-radius: 6px; padding: .6rem 1.2rem; font-size: 1rem; cursor: pointer; }
  button:disabled { opacity: .5; cursor: wait; }
  #status { margin: .75rem 0; color: #666; }
  #status.error { color: var(--accent); }
  #report { border: 1px solid var(--border); border-radius: 8px; padding: 1rem; display: none; }
  #download { display: none; margin: .75rem 0; }
  .spinner { display: inline-block; width: 1em; height: 1em; border: 2px solid var(--border); border-top-color: var(--accent); border-radius: 50%; animation: spin .8s linear infinite; vertical-align: middle; }
  @keyframes spin { to { transform: rotate(360deg); } }
</style>
</head>
<body>
<h1>🎬 TubeLens</h1>
<p>Paste a YouTube link and get a structured report: timestamped outline, key takeaways, and visual notes.</p>

<fieldset>
  <legend>🔐 API Configuration</legend>
  <label for="credential">OpenAI API Key</label>
  <input id="credential" type="password" placeholder="sk-..." autocomplete="off">
</fieldset>

<fieldset>
  <legend>📺 Video</legend>
  <label for="url">YouTube video URL</label>
  <input id="url" type="text" placeholder="https://www.youtube.com/watch?v=example">
</fieldset>

<button id="analyze">🎬 Analyze This Video</button>
<div id="status"></div>
<a id="download" href="#" download>📥 Download Report</a>
<article id="report"></article>

<script>
let sessionId = null;

async function api(path, body) {
  const resp = await fetch(path, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body || {}),
  });
  if (resp.status === 204) return null;
  const data = await resp.json();
  if (!resp.ok) throw new Error(data.error ? data.error.message : resp.statusText);
  return data;
}

async function ensureSession() {
  if (!sessionId) {
    const data = await api('/api/session');
    sessionId = data.session_id;
  }
  return sessionId;
}

function setStatus(text, isError, busy) {
  const el = document.getElementById('status');
  el.className = isError ? 'error' : '';
  el.innerHTML = busy ? '<span class="spinner"></span> ' + text : text;
}

document.getElementById('analyze').addEventListener('click', async () => {
  const button = document.getElementById('analyze');
  const credential = document.getElementById('credential').value;
  const url = document.getElementById('url').value;
  button.disabled = true;
  try {
    const id = await ensureSession();
    if (credential.trim() !== '') {
      await api('/api/credential', { session_id: id, credential: credential });
    }
    setStatus('Analyzing the YouTube video...', false, true);
    const report = await api('/api/analyze', { session_id: id, video_url: url });
    setStatus('');
    const pane = document.getElementById('report');
    pane.innerHTML = report.html;
    pane.style.display = 'block';
    const link = document.getElementById('download');
    link.href = '/api/report/' + id + '/download';
    link.style.display = 'inline-block';
  } catch (err) {
    setStatus(err.message, true, false);
  } finally {
    button.disabled = false;
  }
});
</script>
</body>
</html>
"##;
